use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SessionUser;
use crate::shared::{DomainError, UserId};

/// Claims carried in the payload segment of a backend-issued JWT.
///
/// The signature is not checked here; the backend verifies tokens on every
/// request. Claims are only read to restore the session on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry, seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self, DomainError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| DomainError::DataError("Token has no payload segment".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| DomainError::DataError(format!("Token payload is not base64: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::DataError(format!("Token payload is not valid JSON: {}", e)))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn into_user(self) -> SessionUser {
        SessionUser {
            id: UserId::from_string(&self.user_id),
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}
