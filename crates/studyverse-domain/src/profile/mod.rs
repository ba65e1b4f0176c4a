use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::activity::RawLoginDate;
use crate::shared::{DomainError, UserId};

/// A user's profile record as owned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub login_dates: Vec<RawLoginDate>,
}

impl UserProfile {
    /// Initial shown in the avatar circle
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Source of user profile records
#[async_trait]
pub trait UserProfileSource: Send + Sync {
    /// Fetch a profile. Transport failures map to `UpstreamUnavailable`,
    /// malformed payloads to `DataError`.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, DomainError>;
}
