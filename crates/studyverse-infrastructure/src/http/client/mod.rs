mod auth;
mod chat;
mod schemas;
mod types;
mod users;

pub use schemas::{
    ChatRoomResponse, CreatedMessageResponse, LoginResponse, MessageResponse,
    UserProfileResponse, VerifyResponse,
};
pub use types::{to_domain_error, ApiError, RetryConfig};

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use url::Url;

use crate::config::{AppConfig, TimeoutConfig};
use studyverse_domain::session::TokenStore;
use types::{extract_message, USER_AGENT};

/// REST client for the StudyVerse backend.
///
/// Holds the bearer token of the current session and attaches it to every
/// request. A 401 answer drops the token here and in the token store.
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) retry_config: RetryConfig,
    token: RwLock<Option<String>>,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_config(base_url, &TimeoutConfig::default(), RetryConfig::default())
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Self::with_config(
            config.api_base_url.clone(),
            &config.timeouts,
            config.retry.clone(),
        )
    }

    pub fn with_config(
        base_url: Url,
        timeouts: &TimeoutConfig,
        retry_config: RetryConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeouts.http_request)
            .connect_timeout(timeouts.http_connect)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            retry_config,
            token: RwLock::new(None),
            token_store: None,
        })
    }

    /// Clear the persisted token as well when the backend rejects it
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn set_bearer_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// URL under the base path. Each segment is percent-encoded, so ids
    /// cannot add path components or a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL '{}' cannot take a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the JSON body into `T`
    pub(super) async fn request_json<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        method: Method,
        path: &[&str],
        body: Option<serde_json::Value>,
        token_override: Option<&str>,
    ) -> Result<T> {
        let text = self
            .request_text(operation_name, method, path, body, token_override)
            .await?;

        serde_json::from_str(&text).map_err(|e| {
            ApiError::Payload(format!(
                "{}: {} (body: {})",
                operation_name,
                e,
                text.chars().take(200).collect::<String>()
            ))
            .into()
        })
    }

    /// Send a request and return the raw response body
    pub(super) async fn request_text(
        &self,
        operation_name: &str,
        method: Method,
        path: &[&str],
        body: Option<serde_json::Value>,
        token_override: Option<&str>,
    ) -> Result<String> {
        let url = self.endpoint(path)?;
        let token = match token_override {
            Some(token) => Some(token.to_string()),
            None => self.bearer_token().await,
        };

        let result = self
            .execute_with_retry(operation_name, || {
                let client = self.client.clone();
                let method = method.clone();
                let url = url.clone();
                let body = body.clone();
                let token = token.clone();

                async move { Self::send_once(&client, method, url, body, token).await }
            })
            .await;

        if let Err(e) = &result {
            if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized(_))) {
                self.drop_rejected_token().await;
            }
        }

        result
    }

    async fn send_once(
        client: &Client,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
        token: Option<String>,
    ) -> Result<String> {
        let mut request = client.request(method, url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Transport)?;

        debug!(
            "[http] {} status={} bytes={}",
            url.path(),
            status.as_u16(),
            text.len()
        );

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(extract_message(&text)).into());
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_message(&text),
            }
            .into());
        }

        Ok(text)
    }

    async fn drop_rejected_token(&self) {
        warn!("[http] backend rejected the session token, clearing it");
        *self.token.write().await = None;

        if let Some(store) = &self.token_store {
            if let Err(e) = store.clear().await {
                warn!("[http] failed to clear stored token: {}", e);
            }
        }
    }

    /// Execute a request with retry logic
    ///
    /// Retries on:
    /// - Network errors (connection failures, timeouts)
    /// - 5xx server errors
    /// - 429 Too Many Requests
    ///
    /// Does NOT retry on:
    /// - 4xx client errors (except 429)
    /// - Malformed payloads
    pub(super) async fn execute_with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        mut request_fn: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut backoff_ms = self.retry_config.initial_backoff_ms;

        loop {
            attempt += 1;

            match request_fn().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("{} succeeded after {} attempts", operation_name, attempt);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let retryable = e
                        .downcast_ref::<ApiError>()
                        .is_some_and(ApiError::is_retryable);
                    let should_retry = attempt <= self.retry_config.max_retries && retryable;

                    if !should_retry {
                        if retryable {
                            warn!("{} failed after {} attempts", operation_name, attempt);
                        }
                        return Err(e);
                    }

                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation_name,
                        attempt,
                        self.retry_config.max_retries + 1,
                        e,
                        backoff_ms
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;

                    // Exponential backoff with cap
                    backoff_ms = ((backoff_ms as f64 * self.retry_config.backoff_multiplier)
                        as u64)
                        .min(self.retry_config.max_backoff_ms);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(Url::parse("http://localhost:5000/api/").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = client();
        assert_eq!(
            client.endpoint(&["users", "42"]).unwrap().as_str(),
            "http://localhost:5000/api/users/42"
        );
        assert_eq!(
            client
                .endpoint(&["chatrooms", "7", "messages"])
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/chatrooms/7/messages"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids_as_single_segments() {
        let client = client();
        assert_eq!(
            client
                .endpoint(&["users", "../admin?x=1#frag"])
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/users/..%2Fadmin%3Fx=1%23frag"
        );
        assert_eq!(
            client
                .endpoint(&["chatrooms", "a/b", "messages"])
                .unwrap()
                .path(),
            "/api/chatrooms/a%2Fb/messages"
        );
    }

    #[tokio::test]
    async fn test_bearer_token_roundtrip() {
        let client = client();
        assert_eq!(client.bearer_token().await, None);

        client.set_bearer_token(Some("abc".to_string())).await;
        assert_eq!(client.bearer_token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_retry_stops_on_non_retryable_error() {
        let client = client();
        let mut calls = 0;

        let result: Result<()> = client
            .execute_with_retry("op", || {
                calls += 1;
                async { Err(ApiError::Payload("bad".into()).into()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_error() {
        let client = ApiClient::with_config(
            Url::parse("http://localhost:5000/api/").unwrap(),
            &TimeoutConfig::default(),
            RetryConfig {
                max_retries: 2,
                initial_backoff_ms: 1,
                max_backoff_ms: 2,
                backoff_multiplier: 2.0,
            },
        )
        .unwrap();
        let mut calls = 0;

        let result: Result<u32> = client
            .execute_with_retry("op", || {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt < 3 {
                        Err(ApiError::Status {
                            status: 503,
                            message: "busy".into(),
                        }
                        .into())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }
}
