use chrono::{Duration, NaiveDate};

use super::presence::DatePresenceSet;
use super::types::CalendarDay;

/// Length of the heatmap window, today included
pub const CALENDAR_WINDOW_DAYS: u32 = 365;

/// Trailing window of days ending today, one entry per calendar day
pub fn build_calendar(presence: &DatePresenceSet, today: NaiveDate) -> Vec<CalendarDay> {
    let start = today - Duration::days(i64::from(CALENDAR_WINDOW_DAYS) - 1);

    start
        .iter_days()
        .take(CALENDAR_WINDOW_DAYS as usize)
        .map(|date| CalendarDay {
            date,
            present: presence.contains(date),
        })
        .collect()
}

/// The heatmap window together with its summary numbers
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCalendar {
    days: Vec<CalendarDay>,
    present_days: u32,
}

impl ActivityCalendar {
    pub fn build(presence: &DatePresenceSet, today: NaiveDate) -> Self {
        let days = build_calendar(presence, today);
        let present_days = days.iter().filter(|d| d.present).count() as u32;

        Self { days, present_days }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn into_days(self) -> Vec<CalendarDay> {
        self.days
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// Active days that fall inside the window
    pub fn present_days(&self) -> u32 {
        self.present_days
    }

    /// Share of window days with activity, 0.0 - 100.0
    pub fn presence_rate(&self) -> f64 {
        if self.days.is_empty() {
            return 0.0;
        }
        (self.present_days as f64 / self.days.len() as f64) * 100.0
    }
}
