use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};

use crate::shared::DomainError;

/// Timezone policy used to map an instant to a calendar day.
///
/// The same policy is applied to login timestamps and to "today", so a
/// login and the heatmap cell it lands on always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl DayBoundary {
    /// Calendar day of `instant` under this policy
    pub fn calendar_day<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        match self {
            DayBoundary::Local => instant.with_timezone(&Local).date_naive(),
            DayBoundary::Utc => instant.with_timezone(&Utc).date_naive(),
            DayBoundary::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// The current calendar day
    pub fn today(&self) -> NaiveDate {
        self.calendar_day(&Utc::now())
    }

    /// Parse `local`, `utc` or a `+HH:MM` / `-HH:MM` offset
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "local" => Ok(DayBoundary::Local),
            "utc" | "z" => Ok(DayBoundary::Utc),
            _ => parse_offset(value).map(DayBoundary::Fixed).ok_or_else(|| {
                DomainError::Validation(format!("Invalid day boundary '{}'", value))
            }),
        }
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
