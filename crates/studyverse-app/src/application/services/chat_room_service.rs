use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use studyverse_domain::chat::{
    ChatMessage, ChatRepository, ChatRoom, MessageSender, Participant, RoomTransport,
};
use studyverse_domain::events::{
    EventBus, EventHandler, MessageReceived, ParticipantsUpdated, TypedEventHandlerWrapper,
};
use studyverse_domain::shared::{DomainError, MessageId, RoomId, SubscriptionId, UserId};
use studyverse_domain::validation::validate_room_name;

use super::SessionContext;

/// Room listing and creation, plus opening live room views
pub struct ChatRoomService {
    repository: Arc<dyn ChatRepository>,
    transport: Arc<dyn RoomTransport>,
    event_bus: Arc<dyn EventBus>,
    session: SessionContext,
}

impl ChatRoomService {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        transport: Arc<dyn RoomTransport>,
        event_bus: Arc<dyn EventBus>,
        session: SessionContext,
    ) -> Self {
        Self {
            repository,
            transport,
            event_bus,
            session,
        }
    }

    pub async fn list_rooms(&self) -> Result<Vec<ChatRoom>, DomainError> {
        self.session.require_user_id().await?;
        self.repository.list_rooms().await
    }

    pub async fn create_room(&self, name: &str, image: Option<&str>) -> Result<(), DomainError> {
        self.session.require_user_id().await?;
        let name = name.trim();
        validate_room_name(name)?;
        self.repository
            .create_room(name, image.filter(|i| !i.trim().is_empty()))
            .await
    }

    /// Join a room and start following it.
    ///
    /// Handlers are registered before joining so the participant update
    /// triggered by our own join is not missed.
    pub async fn open_room(&self, room_id: &RoomId) -> Result<ChatRoomView, DomainError> {
        let session = match self.session.current().await {
            Some(session) if session.is_valid() => session,
            _ => {
                return Err(DomainError::NotAuthenticated(
                    "Sign in to open a chatroom".to_string(),
                ))
            }
        };

        let state = Arc::new(RwLock::new(RoomState::default()));
        let closed = Arc::new(AtomicBool::new(false));

        let mut subscriptions = Vec::with_capacity(2);
        subscriptions.push(
            self.event_bus
                .subscribe(TypedEventHandlerWrapper::<MessageReceived, _>::shared(
                    RoomMessageHandler {
                        room_id: room_id.clone(),
                        state: state.clone(),
                        closed: closed.clone(),
                    },
                ))
                .await?,
        );
        subscriptions.push(
            self.event_bus
                .subscribe(TypedEventHandlerWrapper::<ParticipantsUpdated, _>::shared(
                    RoomParticipantsHandler {
                        room_id: room_id.clone(),
                        state: state.clone(),
                        closed: closed.clone(),
                    },
                ))
                .await?,
        );

        let view = ChatRoomView {
            room_id: room_id.clone(),
            sender: MessageSender {
                id: session.user_id().clone(),
                name: session.user().name.clone(),
            },
            repository: self.repository.clone(),
            transport: self.transport.clone(),
            event_bus: self.event_bus.clone(),
            state,
            closed,
            subscriptions: Mutex::new(subscriptions),
        };

        let loaded = futures::try_join!(
            self.repository.list_messages(room_id),
            self.transport.join_room(room_id, session.user_id()),
        );

        match loaded {
            Ok((history, ())) => {
                view.state.write().await.merge_history(history);
                info!(room_id = %room_id, "Opened chatroom");
                Ok(view)
            }
            Err(e) => {
                // Release the handlers before reporting the failure
                view.close().await.ok();
                Err(e)
            }
        }
    }
}

#[derive(Default)]
struct RoomState {
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
    participants: Vec<Participant>,
}

impl RoomState {
    /// Append unless a message with the same id is already shown
    fn push_message(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.id.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Put fetched history in front of anything that arrived live meanwhile
    fn merge_history(&mut self, history: Vec<ChatMessage>) {
        let live = std::mem::take(&mut self.messages);
        self.seen.clear();
        for message in history.into_iter().chain(live) {
            self.push_message(message);
        }
    }
}

/// What a room view currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomSnapshot {
    pub messages: Vec<ChatMessage>,
    pub participants: Vec<Participant>,
}

/// An open chatroom: message list and participants kept current from the
/// realtime channel until `close` is called.
pub struct ChatRoomView {
    room_id: RoomId,
    sender: MessageSender,
    repository: Arc<dyn ChatRepository>,
    transport: Arc<dyn RoomTransport>,
    event_bus: Arc<dyn EventBus>,
    state: Arc<RwLock<RoomState>>,
    closed: Arc<AtomicBool>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl ChatRoomView {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> RoomSnapshot {
        let state = self.state.read().await;
        RoomSnapshot {
            messages: state.messages.clone(),
            participants: state.participants.clone(),
        }
    }

    /// Store a message, show it right away and push it to the room
    pub async fn send(&self, text: &str) -> Result<ChatMessage, DomainError> {
        if self.is_closed() {
            return Err(DomainError::Validation("Chatroom is closed".to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation("Message cannot be empty".to_string()));
        }

        let id = self.repository.post_message(&self.room_id, text).await?;
        let message = ChatMessage {
            id,
            text: text.to_string(),
            timestamp: Utc::now(),
            sender: self.sender.clone(),
        };

        self.state.write().await.push_message(message.clone());

        // Already stored; a failed push only delays delivery to others
        if let Err(e) = self
            .transport
            .broadcast_message(&self.room_id, &message)
            .await
        {
            warn!(room_id = %self.room_id, error = %e, "Failed to broadcast message");
        }

        Ok(message)
    }

    /// Leave the room and drop every handler this view registered.
    /// Safe to call more than once.
    pub async fn close(&self) -> Result<(), DomainError> {
        // Flip under the state lock so no handler mutates state afterwards
        let already_closed = {
            let _state = self.state.write().await;
            self.closed.swap(true, Ordering::SeqCst)
        };
        if already_closed {
            return Ok(());
        }

        let subscriptions = std::mem::take(&mut *self.subscriptions.lock().await);
        release_room(
            self.event_bus.as_ref(),
            self.transport.as_ref(),
            &self.room_id,
            &self.sender.id,
            subscriptions,
        )
        .await
    }
}

impl Drop for ChatRoomView {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let subscriptions = std::mem::take(self.subscriptions.get_mut());
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                room_id = %self.room_id,
                leaked = subscriptions.len(),
                "Chatroom view dropped outside a runtime, handlers stay muted"
            );
            return;
        };

        warn!(room_id = %self.room_id, "Chatroom view dropped without close, releasing");
        let event_bus = self.event_bus.clone();
        let transport = self.transport.clone();
        let room_id = self.room_id.clone();
        let user_id = self.sender.id.clone();
        runtime.spawn(async move {
            if let Err(e) = release_room(
                event_bus.as_ref(),
                transport.as_ref(),
                &room_id,
                &user_id,
                subscriptions,
            )
            .await
            {
                warn!(room_id = %room_id, error = %e, "Failed to leave dropped chatroom");
            }
        });
    }
}

/// Unsubscribe the room handlers, then leave the room
async fn release_room(
    event_bus: &dyn EventBus,
    transport: &dyn RoomTransport,
    room_id: &RoomId,
    user_id: &UserId,
    subscriptions: Vec<SubscriptionId>,
) -> Result<(), DomainError> {
    for id in &subscriptions {
        event_bus.unsubscribe(id).await;
    }
    debug!(
        room_id = %room_id,
        released = subscriptions.len(),
        "Released room subscriptions"
    );

    transport.leave_room(room_id, user_id).await
}

struct RoomMessageHandler {
    room_id: RoomId,
    state: Arc<RwLock<RoomState>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl EventHandler<MessageReceived> for RoomMessageHandler {
    async fn handle(&self, event: &MessageReceived) -> Result<(), DomainError> {
        if self.closed.load(Ordering::SeqCst) || event.room_id != self.room_id {
            return Ok(());
        }
        let mut state = self.state.write().await;
        // close() may have run while we waited for the lock
        if !self.closed.load(Ordering::SeqCst) {
            state.push_message(event.message.clone());
        }
        Ok(())
    }
}

struct RoomParticipantsHandler {
    room_id: RoomId,
    state: Arc<RwLock<RoomState>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl EventHandler<ParticipantsUpdated> for RoomParticipantsHandler {
    async fn handle(&self, event: &ParticipantsUpdated) -> Result<(), DomainError> {
        if self.closed.load(Ordering::SeqCst) || event.room_id != self.room_id {
            return Ok(());
        }
        let mut state = self.state.write().await;
        if !self.closed.load(Ordering::SeqCst) {
            state.participants = event.participants.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "chat_room_service_test.rs"]
mod tests;
