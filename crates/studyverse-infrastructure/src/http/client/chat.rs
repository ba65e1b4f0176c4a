use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::json;

use studyverse_domain::chat::{ChatMessage, ChatRepository, ChatRoom};
use studyverse_domain::shared::{DomainError, MessageId, RoomId};

use super::schemas::{ChatRoomResponse, CreatedMessageResponse, MessageResponse};
use super::types::{to_domain_error, ApiError};

/// A 404 on a room path means the room, not a user
fn room_error(room_id: &RoomId, error: anyhow::Error) -> DomainError {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Status { status: 404, .. }) => {
            DomainError::RoomNotFound(room_id.to_string())
        }
        _ => to_domain_error(error),
    }
}

#[async_trait]
impl ChatRepository for super::ApiClient {
    async fn list_rooms(&self) -> Result<Vec<ChatRoom>, DomainError> {
        let rooms: Vec<ChatRoomResponse> = self
            .request_json("List chatrooms", Method::GET, &["chatrooms"], None, None)
            .await
            .map_err(to_domain_error)?;

        rooms.into_iter().map(ChatRoomResponse::into_domain).collect()
    }

    async fn create_room(&self, name: &str, image: Option<&str>) -> Result<(), DomainError> {
        let body = json!({ "name": name, "image": image.unwrap_or_default() });
        self.request_text("Create chatroom", Method::POST, &["chatrooms"], Some(body), None)
            .await
            .map_err(to_domain_error)?;

        debug!("[chat] created room '{}'", name);
        Ok(())
    }

    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, DomainError> {
        let path = ["chatrooms", room_id.as_str(), "messages"];
        let values: Vec<serde_json::Value> = self
            .request_json("List messages", Method::GET, &path, None, None)
            .await
            .map_err(|e| room_error(room_id, e))?;

        Ok(MessageResponse::decode_list(values))
    }

    async fn post_message(&self, room_id: &RoomId, text: &str) -> Result<MessageId, DomainError> {
        let path = ["chatrooms", room_id.as_str(), "messages"];
        let body = json!({ "text": text });
        let created: CreatedMessageResponse = self
            .request_json("Post message", Method::POST, &path, Some(body), None)
            .await
            .map_err(|e| room_error(room_id, e))?;

        // Older backends answer without an id; the message still went through
        Ok(created
            .id
            .map(|id| MessageId::from_string(&id))
            .unwrap_or_default())
    }
}
