use chrono::NaiveDate;

use super::calendar::ActivityCalendar;
use super::presence::DatePresenceSet;
use super::streak::calculate_streaks;
use super::types::StreakResult;

/// Everything the account page shows about a user's activity.
///
/// `total_days_present` counts distinct active days, the same unit the
/// streaks are measured in. The raw entry count is kept separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityOverview {
    pub today: NaiveDate,
    pub calendar: ActivityCalendar,
    pub streaks: StreakResult,
    pub total_days_present: u32,
    pub recorded_entries: u32,
    pub skipped_entries: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl ActivityOverview {
    pub fn compute(presence: &DatePresenceSet, today: NaiveDate) -> Self {
        Self {
            today,
            calendar: ActivityCalendar::build(presence, today),
            streaks: calculate_streaks(presence, today),
            total_days_present: presence.unique_days() as u32,
            recorded_entries: presence.recorded_entries() as u32,
            skipped_entries: presence.skipped_entries() as u32,
            last_active_date: presence.latest(),
        }
    }

    /// Overview with no activity at all, used when the profile is unavailable
    pub fn empty(today: NaiveDate) -> Self {
        Self::compute(&DatePresenceSet::empty(), today)
    }
}
