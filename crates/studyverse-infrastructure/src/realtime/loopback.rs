use async_trait::async_trait;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use studyverse_domain::chat::{ChatMessage, Participant, RoomTransport};
use studyverse_domain::events::{EventBus, MessageReceived, ParticipantsUpdated};
use studyverse_domain::shared::{DomainError, RoomId, UserId};

/// In-process room transport.
///
/// Keeps the member list of every room and echoes broadcasts back to all
/// subscribers, including the sender.
pub struct LoopbackTransport {
    event_bus: Arc<dyn EventBus>,
    rooms: RwLock<HashMap<RoomId, BTreeMap<UserId, Participant>>>,
    names: RwLock<HashMap<UserId, String>>,
}

impl LoopbackTransport {
    pub fn new(event_bus: Arc<dyn EventBus>) -> Self {
        Self {
            event_bus,
            rooms: RwLock::new(HashMap::new()),
            names: RwLock::new(HashMap::new()),
        }
    }

    /// Display name used in participant lists for this user
    pub async fn introduce(&self, user_id: &UserId, name: &str) {
        self.names
            .write()
            .await
            .insert(user_id.clone(), name.to_string());
    }

    pub async fn participants(&self, room_id: &RoomId) -> Vec<Participant> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn publish_participants(&self, room_id: &RoomId) -> Result<(), DomainError> {
        let participants = self.participants(room_id).await;
        debug!(
            "[realtime] room {} has {} participants",
            room_id,
            participants.len()
        );
        self.event_bus
            .publish(Box::new(ParticipantsUpdated {
                room_id: room_id.clone(),
                participants,
            }))
            .await
    }
}

#[async_trait]
impl RoomTransport for LoopbackTransport {
    async fn join_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), DomainError> {
        let name = self
            .names
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string());

        self.rooms
            .write()
            .await
            .entry(room_id.clone())
            .or_default()
            .insert(
                user_id.clone(),
                Participant {
                    id: user_id.clone(),
                    name,
                },
            );

        self.publish_participants(room_id).await
    }

    async fn leave_room(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), DomainError> {
        let removed = {
            let mut rooms = self.rooms.write().await;
            let removed = rooms
                .get_mut(room_id)
                .and_then(|members| members.remove(user_id))
                .is_some();
            if rooms.get(room_id).is_some_and(BTreeMap::is_empty) {
                rooms.remove(room_id);
            }
            removed
        };

        if removed {
            self.publish_participants(room_id).await?;
        }
        Ok(())
    }

    async fn broadcast_message(
        &self,
        room_id: &RoomId,
        message: &ChatMessage,
    ) -> Result<(), DomainError> {
        self.names
            .write()
            .await
            .entry(message.sender.id.clone())
            .or_insert_with(|| message.sender.name.clone());

        self.event_bus
            .publish(Box::new(MessageReceived {
                room_id: room_id.clone(),
                message: message.clone(),
            }))
            .await
    }
}
