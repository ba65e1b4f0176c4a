use async_trait::async_trait;
use tokio::sync::RwLock;

use studyverse_domain::session::TokenStore;
use studyverse_domain::shared::DomainError;

/// Token store that forgets everything when the process exits
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, DomainError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), DomainError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        *self.token.write().await = None;
        Ok(())
    }
}
