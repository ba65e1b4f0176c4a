use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId);
define_id!(RoomId);
define_id!(MessageId);
define_id!(SubscriptionId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1xxx)
    InvalidCredentials = 1001,
    ExpiredSession = 1002,
    NotAuthenticated = 1003,

    // Resource Not Found (2xxx)
    UserNotFound = 2001,
    RoomNotFound = 2002,

    // Data (4xxx)
    DataError = 4001,
    SerializationError = 4004,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,
    UpstreamUnavailable = 5002,

    // Validation (6xxx)
    ValidationError = 6001,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::InvalidCredentials
            | ErrorCode::ExpiredSession
            | ErrorCode::NotAuthenticated
            | ErrorCode::UpstreamUnavailable
            | ErrorCode::DataError => ErrorSeverity::Warning,

            ErrorCode::UserNotFound | ErrorCode::RoomNotFound | ErrorCode::ValidationError => {
                ErrorSeverity::Info
            }

            ErrorCode::SerializationError | ErrorCode::InfrastructureError => ErrorSeverity::Error,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::UpstreamUnavailable | ErrorCode::InfrastructureError
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Session expired: {0}")]
    ExpiredSession(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InvalidCredentials(_) => ErrorCode::InvalidCredentials,
            DomainError::ExpiredSession(_) => ErrorCode::ExpiredSession,
            DomainError::NotAuthenticated(_) => ErrorCode::NotAuthenticated,
            DomainError::UserNotFound(_) => ErrorCode::UserNotFound,
            DomainError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            DomainError::DataError(_) => ErrorCode::DataError,
            DomainError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::Serialization(_) => ErrorCode::SerializationError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::InvalidCredentials(msg)
            | DomainError::ExpiredSession(msg)
            | DomainError::NotAuthenticated(msg)
            | DomainError::UserNotFound(msg)
            | DomainError::RoomNotFound(msg)
            | DomainError::DataError(msg)
            | DomainError::UpstreamUnavailable(msg)
            | DomainError::Validation(msg)
            | DomainError::Serialization(msg)
            | DomainError::Infrastructure(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
