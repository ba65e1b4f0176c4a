use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::application::services::SessionContext;
use studyverse_domain::events::{EventHandler, SessionStarted};
use studyverse_domain::shared::DomainError;
use studyverse_infrastructure::realtime::LoopbackTransport;

/// Tells the room transport the display name of whoever just signed in,
/// so participant lists show names instead of ids.
pub struct ParticipantDirectoryHandler {
    session: SessionContext,
    transport: Arc<LoopbackTransport>,
}

impl ParticipantDirectoryHandler {
    pub fn new(session: SessionContext, transport: Arc<LoopbackTransport>) -> Self {
        Self { session, transport }
    }
}

#[async_trait]
impl EventHandler<SessionStarted> for ParticipantDirectoryHandler {
    async fn handle(&self, event: &SessionStarted) -> Result<(), DomainError> {
        let Some(session) = self.session.current().await else {
            return Ok(());
        };
        if session.user_id() != &event.user_id {
            return Ok(());
        }

        self.transport
            .introduce(&event.user_id, &session.user().name)
            .await;
        debug!(user_id = %event.user_id, "Registered participant name");
        Ok(())
    }
}
