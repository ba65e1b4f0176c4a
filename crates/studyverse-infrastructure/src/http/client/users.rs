use async_trait::async_trait;
use log::debug;
use reqwest::Method;

use studyverse_domain::profile::{UserProfile, UserProfileSource};
use studyverse_domain::shared::{DomainError, UserId};

use super::schemas::UserProfileResponse;
use super::types::to_domain_error;

impl super::ApiClient {
    /// Fetch the raw profile record of a user
    pub async fn get_user_profile(&self, user_id: &UserId) -> anyhow::Result<UserProfileResponse> {
        self.request_json(
            "Get user profile",
            Method::GET,
            &["users", user_id.as_str()],
            None,
            None,
        )
        .await
    }
}

#[async_trait]
impl UserProfileSource for super::ApiClient {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, DomainError> {
        let response = self
            .get_user_profile(user_id)
            .await
            .map_err(to_domain_error)?;

        let profile = response.into_domain()?;
        debug!(
            "[profile] fetched user {} with {} login entries",
            profile.id,
            profile.login_dates.len()
        );
        Ok(profile)
    }
}
