use std::sync::Arc;

use crate::application::queries::ActivityQueries;
use crate::application::services::{AuthService, ChatRoomService, SessionContext};
use studyverse_domain::events::EventBus;
use studyverse_domain::session::TokenStore;
use studyverse_infrastructure::config::AppConfig;
use studyverse_infrastructure::http::ApiClient;
use studyverse_infrastructure::realtime::LoopbackTransport;

pub struct Runtime {
    pub api_client: Arc<ApiClient>,
    pub event_bus: Arc<dyn EventBus>,
    pub token_store: Arc<dyn TokenStore>,
    pub transport: Arc<LoopbackTransport>,
}

pub struct Services {
    pub auth: Arc<AuthService>,
    pub chat: Arc<ChatRoomService>,
}

pub struct Queries {
    pub activity: Arc<ActivityQueries>,
}

pub struct AppState {
    pub config: AppConfig,
    pub runtime: Runtime,
    pub session: SessionContext,
    pub services: Services,
    pub queries: Queries,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        crate::presentation::bootstrap::build_app_state(config).await
    }
}
