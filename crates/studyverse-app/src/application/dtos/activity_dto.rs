use serde::{Deserialize, Serialize};

use studyverse_domain::activity::{ActivityOverview, CalendarDay, StreakResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDayDto {
    pub date: String, // YYYY-MM-DD
    pub present: bool,
}

impl From<&CalendarDay> for CalendarDayDto {
    fn from(day: &CalendarDay) -> Self {
        Self {
            date: day.date.format(DATE_FORMAT).to_string(),
            present: day.present,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDto {
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl From<StreakResult> for StreakDto {
    fn from(streaks: StreakResult) -> Self {
        Self {
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
        }
    }
}

/// Account page activity block: heatmap window plus streak counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOverviewDto {
    pub user_id: String,
    pub today: String,
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<CalendarDayDto>,
    pub streaks: StreakDto,
    pub days_present_in_window: u32,
    pub presence_rate: f64, // 0.0 - 100.0
    pub total_days_present: u32,
    pub recorded_entries: u32,
    pub skipped_entries: u32,
    pub last_active_date: Option<String>,
    /// False when the profile could not be loaded and the overview is empty
    pub available: bool,
}

impl ActivityOverviewDto {
    pub fn from_overview(user_id: &str, overview: &ActivityOverview, available: bool) -> Self {
        let calendar = &overview.calendar;
        let format = |date: chrono::NaiveDate| date.format(DATE_FORMAT).to_string();

        Self {
            user_id: user_id.to_string(),
            today: format(overview.today),
            start_date: calendar.start().map(format).unwrap_or_default(),
            end_date: calendar.end().map(format).unwrap_or_default(),
            days: calendar.days().iter().map(CalendarDayDto::from).collect(),
            streaks: overview.streaks.into(),
            days_present_in_window: calendar.present_days(),
            presence_rate: calendar.presence_rate(),
            total_days_present: overview.total_days_present,
            recorded_entries: overview.recorded_entries,
            skipped_entries: overview.skipped_entries,
            last_active_date: overview.last_active_date.map(format),
            available,
        }
    }
}
