use std::sync::Arc;
use tokio::sync::RwLock;

use studyverse_domain::session::Session;
use studyverse_domain::shared::{DomainError, UserId};

/// The signed-in session, shared by every service that needs the user.
///
/// Created empty at startup, filled on login or restore and emptied on
/// logout. Clones share the same slot.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    /// Drop the session, returning it if there was one
    pub async fn end(&self) -> Option<Session> {
        self.inner.write().await.take()
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .await
            .as_ref()
            .is_some_and(Session::is_valid)
    }

    /// Id of the signed-in user, or `NotAuthenticated`
    pub async fn require_user_id(&self) -> Result<UserId, DomainError> {
        match self.inner.read().await.as_ref() {
            Some(session) if session.is_valid() => Ok(session.user_id().clone()),
            Some(_) => Err(DomainError::ExpiredSession(
                "Session has expired".to_string(),
            )),
            None => Err(DomainError::NotAuthenticated(
                "No user is signed in".to_string(),
            )),
        }
    }
}
