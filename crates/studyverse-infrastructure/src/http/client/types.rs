use anyhow::Error;
use reqwest::StatusCode;

use studyverse_domain::shared::DomainError;

pub const USER_AGENT: &str = concat!("studyverse-client/", env!("CARGO_PKG_VERSION"));

/// HTTP retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 2)
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds (default: 500ms)
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 5000ms)
    pub max_backoff_ms: u64,
    /// Backoff multiplier (default: 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Failure of a single backend call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error("not logged in")]
    MissingToken,
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            ApiError::Status { status, .. } => {
                *status >= 500 || *status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            }
            _ => false,
        }
    }
}

/// Map an infrastructure error onto the domain error kinds.
///
/// Unreachable backends and 5xx answers become `UpstreamUnavailable`;
/// payloads that do not match the schema become `DataError`.
pub fn to_domain_error(error: Error) -> DomainError {
    match error.downcast::<ApiError>() {
        Ok(ApiError::Unauthorized(msg)) => DomainError::ExpiredSession(msg),
        Ok(ApiError::MissingToken) => {
            DomainError::NotAuthenticated("No session token available".to_string())
        }
        Ok(ApiError::Payload(msg)) => DomainError::DataError(msg),
        Ok(ApiError::Status { status, message }) if status == 404 => {
            DomainError::UserNotFound(message)
        }
        Ok(ApiError::Status { status, message }) if status >= 500 || status == 429 => {
            DomainError::UpstreamUnavailable(format!("{}: {}", status, message))
        }
        Ok(ApiError::Status { message, .. }) => DomainError::Validation(message),
        Ok(ApiError::Transport(e)) => DomainError::UpstreamUnavailable(e.to_string()),
        Err(other) => DomainError::Infrastructure(other.to_string()),
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text
pub(super) fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message":"Invalid email or password"}"#),
            "Invalid email or password"
        );
        assert_eq!(extract_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_status_retryability() {
        let server = ApiError::Status {
            status: 503,
            message: String::new(),
        };
        let throttled = ApiError::Status {
            status: 429,
            message: String::new(),
        };
        let client = ApiError::Status {
            status: 400,
            message: String::new(),
        };
        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!client.is_retryable());
        assert!(!ApiError::Unauthorized("x".into()).is_retryable());
    }

    #[test]
    fn test_to_domain_error_mapping() {
        assert!(matches!(
            to_domain_error(ApiError::Unauthorized("expired".into()).into()),
            DomainError::ExpiredSession(_)
        ));
        assert!(matches!(
            to_domain_error(ApiError::Payload("no _id".into()).into()),
            DomainError::DataError(_)
        ));
        assert!(matches!(
            to_domain_error(
                ApiError::Status {
                    status: 502,
                    message: "down".into()
                }
                .into()
            ),
            DomainError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            to_domain_error(
                ApiError::Status {
                    status: 404,
                    message: "User not found".into()
                }
                .into()
            ),
            DomainError::UserNotFound(_)
        ));
        assert!(matches!(
            to_domain_error(anyhow::anyhow!("bad url")),
            DomainError::Infrastructure(_)
        ));
    }
}
