//! Activity aggregation over a user's login history.
//!
//! Login timestamps are normalized to calendar days under a single
//! [`DayBoundary`] policy, collected into a [`DatePresenceSet`], and from
//! there turned into the trailing 365-day heatmap and the streak numbers.

mod calendar;
mod day_boundary;
mod overview;
mod presence;
mod streak;
mod types;

#[cfg(test)]
mod streak_test;

pub use calendar::{build_calendar, ActivityCalendar, CALENDAR_WINDOW_DAYS};
pub use day_boundary::DayBoundary;
pub use overview::ActivityOverview;
pub use presence::{parse_login_date, DatePresenceSet};
pub use streak::{calculate_streaks, current_streak, longest_streak};
pub use types::{CalendarDay, RawLoginDate, StreakResult};
