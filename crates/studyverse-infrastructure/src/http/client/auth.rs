use async_trait::async_trait;
use log::info;
use reqwest::Method;
use serde_json::json;

use studyverse_domain::session::{AuthGateway, LoginGrant, Registration, SessionUser};
use studyverse_domain::shared::DomainError;

use super::schemas::{LoginResponse, VerifyResponse};
use super::types::{to_domain_error, ApiError};

/// Login answers 400/401 for wrong credentials; keep the backend's message
fn login_error(error: anyhow::Error) -> DomainError {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(message)) => DomainError::InvalidCredentials(message.clone()),
        Some(ApiError::Status { status, message }) if *status == 400 || *status == 404 => {
            DomainError::InvalidCredentials(message.clone())
        }
        _ => to_domain_error(error),
    }
}

#[async_trait]
impl AuthGateway for super::ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, DomainError> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .request_json("Login", Method::POST, &["login"], Some(body), None)
            .await
            .map_err(login_error)?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::DataError("login response has no token".to_string()))?;
        let user = response
            .user
            .ok_or_else(|| DomainError::DataError("login response has no user".to_string()))?
            .into_session_user()?;

        info!("[auth] logged in as {}", user.id);
        Ok(LoginGrant { token, user })
    }

    async fn verify(&self, token: &str) -> Result<SessionUser, DomainError> {
        let response: VerifyResponse = self
            .request_json("Verify token", Method::GET, &["users", "verify"], None, Some(token))
            .await
            .map_err(to_domain_error)?;

        response
            .user
            .ok_or_else(|| DomainError::DataError("verify response has no user".to_string()))?
            .into_session_user()
    }

    async fn register(&self, registration: &Registration) -> Result<(), DomainError> {
        let body = json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password,
        });
        self.request_text("Register", Method::POST, &["register"], Some(body), None)
            .await
            .map_err(to_domain_error)?;

        info!("[auth] registered {}", registration.email);
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let body = json!({ "email": email });
        self.request_text(
            "Request password reset",
            Method::POST,
            &["auth", "reset-password"],
            Some(body),
            None,
        )
        .await
        .map_err(to_domain_error)?;
        Ok(())
    }

    async fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let body = json!({ "token": reset_token, "newPassword": new_password });
        self.request_text(
            "Update password",
            Method::POST,
            &["auth", "update-password"],
            Some(body),
            None,
        )
        .await
        .map_err(to_domain_error)?;
        Ok(())
    }
}
