use serde::{Deserialize, Serialize};

use studyverse_domain::chat::{ChatMessage, ChatRoom, Participant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoomDto {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&ChatRoom> for ChatRoomDto {
    fn from(room: &ChatRoom) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.clone(),
            image: room.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub text: String,
    pub timestamp: String, // RFC 3339
    pub sender_id: String,
    pub sender_name: String,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            text: message.text.clone(),
            timestamp: message.timestamp.to_rfc3339(),
            sender_id: message.sender.id.to_string(),
            sender_name: message.sender.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.to_string(),
            name: participant.name.clone(),
        }
    }
}
