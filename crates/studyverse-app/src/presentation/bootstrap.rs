use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::application::event_handlers::ParticipantDirectoryHandler;
use crate::application::queries::ActivityQueries;
use crate::application::services::{AuthService, ChatRoomService, SessionContext};
use crate::presentation::state::{AppState, Queries, Runtime, Services};
use studyverse_domain::events::{EventBus, SessionStarted, TypedEventHandlerWrapper};
use studyverse_domain::session::TokenStore;
use studyverse_infrastructure::config::AppConfig;
use studyverse_infrastructure::events::InMemoryEventBus;
use studyverse_infrastructure::http::ApiClient;
use studyverse_infrastructure::persistence::FileTokenStore;
use studyverse_infrastructure::realtime::LoopbackTransport;

pub async fn build_app_state(config: AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let startup_started_at = Instant::now();

    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| format!("Failed to create data directory: {}", e))?;
    info!(data_dir = %config.data_dir.display(), "✓ Ensured data dir exists");

    let token_store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path()));

    let started_at = Instant::now();
    let api_client = Arc::new(
        ApiClient::from_app_config(&config)
            .map_err(|e| format!("Failed to create API client: {}", e))?
            .with_token_store(token_store.clone()),
    );
    info!(
        base_url = %api_client.base_url(),
        "✓ API client ready ({}ms)",
        started_at.elapsed().as_millis()
    );

    let event_bus: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let transport = Arc::new(LoopbackTransport::new(event_bus.clone()));
    let session = SessionContext::new();

    event_bus
        .subscribe(TypedEventHandlerWrapper::<SessionStarted, _>::shared(
            ParticipantDirectoryHandler::new(session.clone(), transport.clone()),
        ))
        .await?;

    let auth = Arc::new(AuthService::new(
        api_client.clone(),
        token_store.clone(),
        api_client.clone(),
        session.clone(),
        event_bus.clone(),
    ));

    // A broken token store must not keep the app from starting
    let started_at = Instant::now();
    match auth.restore().await {
        Ok(Some(restored)) => info!(
            user_id = %restored.user_id(),
            "✓ Restored session ({}ms)",
            started_at.elapsed().as_millis()
        ),
        Ok(None) => info!("No stored session"),
        Err(e) => warn!(error = %e, "Failed to restore session"),
    }

    let chat = Arc::new(ChatRoomService::new(
        api_client.clone(),
        transport.clone(),
        event_bus.clone(),
        session.clone(),
    ));

    let activity = Arc::new(ActivityQueries::new(
        api_client.clone(),
        config.day_boundary,
    ));

    info!(
        "✓ Application state ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        config,
        runtime: Runtime {
            api_client,
            event_bus,
            token_store,
            transport,
        },
        session,
        services: Services { auth, chat },
        queries: Queries { activity },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use studyverse_infrastructure::config::{ENV_API_URL, ENV_DATA_DIR, ENV_DAY_BOUNDARY};
    use studyverse_infrastructure::http::RetryConfig;
    use tempfile::TempDir;

    fn config(data_dir: &TempDir) -> AppConfig {
        let vars: HashMap<&str, String> = HashMap::from([
            // Nothing listens on port 9 locally
            (ENV_API_URL, "http://127.0.0.1:9/api".to_string()),
            (ENV_DATA_DIR, data_dir.path().display().to_string()),
            (ENV_DAY_BOUNDARY, "utc".to_string()),
        ]);
        let mut config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        config.retry = RetryConfig::none();
        config
    }

    fn live_token() -> String {
        let claims = serde_json::json!({
            "userId": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "exp": (Utc::now() + Duration::hours(2)).timestamp()
        });
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    #[tokio::test]
    async fn test_fresh_start_has_no_session() {
        let dir = TempDir::new().unwrap();
        let state = build_app_state(config(&dir)).await.unwrap();

        assert!(!state.session.is_authenticated().await);
        assert_eq!(state.runtime.api_client.bearer_token().await, None);
    }

    #[tokio::test]
    async fn test_stored_session_is_restored_and_logout_removes_it() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        FileTokenStore::new(config.token_path())
            .save(&live_token())
            .await
            .unwrap();
        let token_path = config.token_path();

        let state = build_app_state(config).await.unwrap();
        assert!(state.session.is_authenticated().await);
        assert!(state.runtime.api_client.bearer_token().await.is_some());

        state.services.auth.logout().await.unwrap();

        assert!(state.session.current().await.is_none());
        assert!(!token_path.exists());
        assert_eq!(state.runtime.token_store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreachable_backend_gives_empty_overview() {
        let dir = TempDir::new().unwrap();
        let state = build_app_state(config(&dir)).await.unwrap();

        let overview = state.queries.activity.get_overview("u1").await.unwrap();

        assert!(!overview.available);
        assert_eq!(overview.days.len(), 365);
        assert_eq!(overview.streaks.current_streak, 0);
        assert_eq!(overview.streaks.longest_streak, 0);
    }
}
