use async_trait::async_trait;

use crate::shared::DomainError;

/// Persistent storage for the bearer token between runs
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, DomainError>;

    async fn save(&self, token: &str) -> Result<(), DomainError>;

    /// Remove the stored token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), DomainError>;
}
