use async_trait::async_trait;

use super::SessionUser;
use crate::shared::DomainError;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub user: SessionUser,
}

/// New account details for sign-up
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Backend authentication endpoints
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, DomainError>;

    /// Ask the backend who a token belongs to
    async fn verify(&self, token: &str) -> Result<SessionUser, DomainError>;

    async fn register(&self, registration: &Registration) -> Result<(), DomainError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), DomainError>;

    async fn update_password(&self, reset_token: &str, new_password: &str)
        -> Result<(), DomainError>;
}
