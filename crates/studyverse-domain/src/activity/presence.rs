use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use std::collections::BTreeSet;

use super::day_boundary::DayBoundary;
use super::types::RawLoginDate;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// The set of calendar days on which a user was active.
///
/// Days are kept sorted and unique; repeated logins on the same day count
/// once. The number of raw entries and of entries that could not be parsed
/// are kept alongside for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatePresenceSet {
    days: BTreeSet<NaiveDate>,
    recorded_entries: usize,
    skipped_entries: usize,
}

impl DatePresenceSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-normalized calendar days
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        let mut recorded_entries = 0;
        let days = dates
            .into_iter()
            .inspect(|_| recorded_entries += 1)
            .collect::<BTreeSet<_>>();

        Self {
            days,
            recorded_entries,
            skipped_entries: 0,
        }
    }

    /// Build from raw profile entries, skipping anything unparseable
    pub fn from_raw(entries: &[RawLoginDate], boundary: DayBoundary) -> Self {
        let mut days = BTreeSet::new();
        let mut skipped_entries = 0;

        for entry in entries {
            match parse_login_date(entry, boundary) {
                Some(day) => {
                    days.insert(day);
                }
                None => {
                    warn!("[activity] skip unparseable login date value={}", entry);
                    skipped_entries += 1;
                }
            }
        }

        Self {
            days,
            recorded_entries: entries.len(),
            skipped_entries,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    /// Active days in ascending order
    pub fn days(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of distinct active days
    pub fn unique_days(&self) -> usize {
        self.days.len()
    }

    /// Number of entries in the source record, duplicates and bad entries included
    pub fn recorded_entries(&self) -> usize {
        self.recorded_entries
    }

    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }
}

/// Normalize one login entry to a calendar day.
///
/// Timestamps carrying an offset are converted under `boundary`. Date-only
/// values and timestamps without an offset are taken at face value.
pub fn parse_login_date(entry: &RawLoginDate, boundary: DayBoundary) -> Option<NaiveDate> {
    match entry {
        RawLoginDate::EpochMillis(ms) => {
            DateTime::from_timestamp_millis(*ms).map(|instant| boundary.calendar_day(&instant))
        }
        RawLoginDate::Text(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }

            if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
                return Some(boundary.calendar_day(&instant));
            }

            if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                return Some(day);
            }

            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        }
    }
}
