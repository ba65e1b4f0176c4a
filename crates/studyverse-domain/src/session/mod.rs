mod auth_gateway;
mod token_claims;
mod token_store;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, UserId};

pub use auth_gateway::{AuthGateway, LoginGrant, Registration};
pub use token_claims::TokenClaims;
pub use token_store::TokenStore;

/// The authenticated user as carried in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Session value object
/// Bearer token plus the user it was issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    user: SessionUser,
    token: String,
    expires_at: Option<DateTime<Utc>>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    pub fn new(
        user: SessionUser,
        token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if token.is_empty() {
            return Err(DomainError::Validation(
                "Session token cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            user,
            token,
            expires_at,
            started_at: Utc::now(),
        })
    }

    /// Rebuild a session from a stored token by reading its claims.
    ///
    /// Fails with `ExpiredSession` when the token is past its expiry.
    pub fn from_token(token: &str) -> Result<Self, DomainError> {
        let claims = TokenClaims::decode(token)?;
        let expires_at = claims.expires_at();

        if let Some(exp) = expires_at {
            if exp <= Utc::now() {
                return Err(DomainError::ExpiredSession(format!(
                    "Token expired at {}",
                    exp.to_rfc3339()
                )));
            }
        }

        Self::new(claims.into_user(), token.to_string(), expires_at)
    }

    /// Check if session is still valid
    pub fn is_valid(&self) -> bool {
        self.expires_at.is_none_or(|exp| Utc::now() < exp)
    }

    /// Check if session will expire soon (within given hours)
    pub fn expires_soon(&self, hours: i64) -> bool {
        let threshold = Utc::now() + Duration::hours(hours);
        self.expires_at.is_some_and(|exp| exp < threshold)
    }

    // Getters
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
