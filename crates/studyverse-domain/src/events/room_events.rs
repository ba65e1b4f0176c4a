use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Participant};
use crate::shared::RoomId;

/// A message pushed to a room (`newMessage` on the socket)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReceived {
    pub room_id: RoomId,
    pub message: ChatMessage,
}

impl_domain_event!(MessageReceived);

/// Full participant list of a room after someone joined or left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsUpdated {
    pub room_id: RoomId,
    pub participants: Vec<Participant>,
}

impl_domain_event!(ParticipantsUpdated);
