use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use studyverse_domain::events::{EventBus, SessionEnded, SessionStarted};
use studyverse_domain::session::{AuthGateway, Registration, Session, TokenClaims, TokenStore};
use studyverse_domain::shared::DomainError;
use studyverse_domain::validation::{validate_email, validate_name, validate_password};
use studyverse_infrastructure::http::ApiClient;

use super::SessionContext;

/// Login, logout and session restore.
///
/// Keeps three things in step: the session context, the persisted token
/// and the bearer token on the API client.
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    token_store: Arc<dyn TokenStore>,
    api_client: Arc<ApiClient>,
    session: SessionContext,
    event_bus: Arc<dyn EventBus>,
}

impl AuthService {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        token_store: Arc<dyn TokenStore>,
        api_client: Arc<ApiClient>,
        session: SessionContext,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            gateway,
            token_store,
            api_client,
            session,
            event_bus,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Rebuild the session from the stored token at startup.
    ///
    /// Expired or unreadable tokens are removed. A token that carries no
    /// expiry is checked against the backend before it is trusted.
    pub async fn restore(&self) -> Result<Option<Session>, DomainError> {
        let Some(token) = self.token_store.load().await? else {
            return Ok(None);
        };

        let session = match Session::from_token(&token) {
            Ok(session) if session.expires_at().is_some() => session,
            Ok(_) => match self.gateway.verify(&token).await {
                Ok(user) => Session::new(user, token, None)?,
                Err(e) => {
                    warn!(error = %e, "Stored token rejected by backend");
                    self.token_store.clear().await?;
                    return Ok(None);
                }
            },
            Err(e) => {
                info!(error = %e, "Discarding stored token");
                self.token_store.clear().await?;
                return Ok(None);
            }
        };

        self.start(session.clone(), true).await?;
        Ok(Some(session))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()));
        }

        let grant = self.gateway.login(email.trim(), password).await?;

        // The backend's user record wins; the token only contributes its expiry
        let expires_at = TokenClaims::decode(&grant.token)
            .ok()
            .and_then(|claims| claims.expires_at());
        let session = Session::new(grant.user, grant.token.clone(), expires_at)?;
        if !session.is_valid() {
            return Err(DomainError::ExpiredSession(
                "Backend issued an expired token".to_string(),
            ));
        }

        self.token_store.save(&grant.token).await?;
        self.start(session.clone(), false).await?;
        Ok(session)
    }

    /// Tear down the session. Logging out twice is harmless.
    pub async fn logout(&self) -> Result<(), DomainError> {
        let ended = self.session.end().await;
        self.api_client.set_bearer_token(None).await;
        self.token_store.clear().await?;

        if let Some(session) = ended {
            info!(user_id = %session.user_id(), "Session ended");
            self.event_bus
                .publish(Box::new(SessionEnded {
                    user_id: session.user_id().clone(),
                    occurred_at: Utc::now(),
                }))
                .await?;
        }
        Ok(())
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), DomainError> {
        validate_name(&registration.name)?;
        validate_email(&registration.email)?;
        validate_password(&registration.password)?;

        self.gateway.register(registration).await
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), DomainError> {
        validate_email(email)?;
        self.gateway.request_password_reset(email.trim()).await
    }

    pub async fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if reset_token.trim().is_empty() {
            return Err(DomainError::Validation("Reset token is required".to_string()));
        }
        validate_password(new_password)?;
        self.gateway.update_password(reset_token, new_password).await
    }

    async fn start(&self, session: Session, restored: bool) -> Result<(), DomainError> {
        let user_id = session.user_id().clone();
        self.api_client
            .set_bearer_token(Some(session.token().to_string()))
            .await;
        self.session.begin(session).await;

        info!(user_id = %user_id, restored, "Session started");
        self.event_bus
            .publish(Box::new(SessionStarted {
                user_id,
                restored,
                occurred_at: Utc::now(),
            }))
            .await
    }
}

#[cfg(test)]
#[path = "auth_service_test.rs"]
mod tests;
