use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::dtos::{ActivityOverviewDto, CalendarDayDto, StreakDto};
use studyverse_domain::activity::DayBoundary;
use studyverse_domain::profile::UserProfileSource;
use studyverse_domain::shared::{DomainError, UserId};

mod overview;


/// Read side of the account page activity block
pub struct ActivityQueries {
    profile_source: Arc<dyn UserProfileSource>,
    day_boundary: DayBoundary,
    fixed_today: Option<NaiveDate>,
}

impl ActivityQueries {
    pub fn new(profile_source: Arc<dyn UserProfileSource>, day_boundary: DayBoundary) -> Self {
        Self {
            profile_source,
            day_boundary,
            fixed_today: None,
        }
    }

    /// Pin "today" instead of reading the clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| self.day_boundary.today())
    }

    /// Heatmap window, streaks and counts for a user.
    ///
    /// Never fails because of the backend: an unreachable or malformed
    /// profile gives an empty overview with `available = false`.
    pub async fn get_overview(&self, user_id: &str) -> Result<ActivityOverviewDto, DomainError> {
        let user_id = parse_user_id(user_id)?;
        Ok(overview::get_overview(
            self.profile_source.as_ref(),
            &user_id,
            self.day_boundary,
            self.today(),
        )
        .await)
    }

    /// Current and longest streak only
    pub async fn get_streaks(&self, user_id: &str) -> Result<StreakDto, DomainError> {
        Ok(self.get_overview(user_id).await?.streaks)
    }

    /// The 365 heatmap cells, oldest first
    pub async fn get_calendar(&self, user_id: &str) -> Result<Vec<CalendarDayDto>, DomainError> {
        Ok(self.get_overview(user_id).await?.days)
    }
}

fn parse_user_id(user_id: &str) -> Result<UserId, DomainError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("User id cannot be empty".to_string()));
    }
    Ok(UserId::from_string(trimmed))
}
