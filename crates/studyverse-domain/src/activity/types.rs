use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cell of the activity heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// A login date as it arrives from the profile record, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLoginDate {
    /// ISO 8601 text: `2024-06-09`, `2024-06-09T08:15:00Z`, `2024-06-09T08:15:00`
    Text(String),
    /// Milliseconds since the Unix epoch
    EpochMillis(i64),
}

impl RawLoginDate {
    pub fn text(value: impl Into<String>) -> Self {
        RawLoginDate::Text(value.into())
    }
}

impl std::fmt::Display for RawLoginDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawLoginDate::Text(s) => write!(f, "{}", s),
            RawLoginDate::EpochMillis(ms) => write!(f, "{}ms", ms),
        }
    }
}
