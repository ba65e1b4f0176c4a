use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, MessageId, RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub sender: MessageSender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: RoomId,
    pub name: String,
    pub image: Option<String>,
}

/// REST side of the chatrooms: listing, creation and message history
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn list_rooms(&self) -> Result<Vec<ChatRoom>, DomainError>;

    async fn create_room(&self, name: &str, image: Option<&str>) -> Result<(), DomainError>;

    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, DomainError>;

    /// Store a message and return the id assigned by the backend
    async fn post_message(&self, room_id: &RoomId, text: &str) -> Result<MessageId, DomainError>;
}

/// Outgoing half of the realtime room channel.
/// Incoming events arrive through the event bus.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    async fn join_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), DomainError>;

    async fn leave_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), DomainError>;

    async fn broadcast_message(
        &self,
        room_id: &RoomId,
        message: &ChatMessage,
    ) -> Result<(), DomainError>;
}
