//! Wire schemas of the backend's JSON responses.
//!
//! Fields the backend may omit are optional here; `into_domain` decides
//! which of them are required and turns gaps into `DataError`.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use studyverse_domain::activity::RawLoginDate;
use studyverse_domain::chat::{ChatMessage, ChatRoom, MessageSender};
use studyverse_domain::profile::UserProfile;
use studyverse_domain::session::SessionUser;
use studyverse_domain::shared::{DomainError, MessageId, RoomId, UserId};

fn required(value: Option<String>, field: &str, record: &str) -> Result<String, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::DataError(format!("{} is missing '{}'", record, field)))
}

fn login_date_from_json(value: serde_json::Value) -> RawLoginDate {
    match value {
        serde_json::Value::String(text) => RawLoginDate::Text(text),
        serde_json::Value::Number(n) if n.is_i64() => {
            RawLoginDate::EpochMillis(n.as_i64().unwrap_or_default())
        }
        // Anything else is kept as text so it is counted as a skipped entry
        other => RawLoginDate::Text(other.to_string()),
    }
}

/// `GET /users/{id}`, also the `user` object of login and verify responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(rename = "loginDates", default)]
    pub login_dates: Option<Vec<serde_json::Value>>,
}

impl UserProfileResponse {
    pub fn into_domain(self) -> Result<UserProfile, DomainError> {
        let id = required(self.id, "_id", "user profile")?;
        let name = required(self.name, "name", "user profile")?;
        let email = required(self.email, "email", "user profile")?;

        let login_dates = self
            .login_dates
            .unwrap_or_default()
            .into_iter()
            .map(login_date_from_json)
            .collect();

        Ok(UserProfile {
            id: UserId::from_string(&id),
            name,
            email,
            role: self.role,
            login_dates,
        })
    }

    pub fn into_session_user(self) -> Result<SessionUser, DomainError> {
        let id = required(self.id, "_id", "user")?;
        Ok(SessionUser {
            id: UserId::from_string(&id),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role: self.role,
        })
    }
}

/// `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfileResponse>,
}

/// `GET /users/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub user: Option<UserProfileResponse>,
}

/// Element of `GET /chatrooms`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRoomResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ChatRoomResponse {
    pub fn into_domain(self) -> Result<ChatRoom, DomainError> {
        Ok(ChatRoom {
            id: RoomId::from_string(&required(self.id, "_id", "chat room")?),
            name: required(self.name, "name", "chat room")?,
            image: self.image.filter(|i| !i.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSenderResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Element of `GET /chatrooms/{id}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sender: Option<MessageSenderResponse>,
}

impl MessageResponse {
    pub fn into_domain(self) -> Result<ChatMessage, DomainError> {
        let sender = self
            .sender
            .ok_or_else(|| DomainError::DataError("message is missing 'sender'".to_string()))?;

        Ok(ChatMessage {
            id: MessageId::from_string(&required(self.id, "_id", "message")?),
            text: self.text.unwrap_or_default(),
            timestamp: self.timestamp.ok_or_else(|| {
                DomainError::DataError("message is missing 'timestamp'".to_string())
            })?,
            sender: MessageSender {
                id: UserId::from_string(&required(sender.id, "_id", "message sender")?),
                name: sender.name.unwrap_or_default(),
            },
        })
    }

    /// Decode a message list, dropping elements that do not match the schema
    pub fn decode_list(values: Vec<serde_json::Value>) -> Vec<ChatMessage> {
        let total = values.len();
        let messages: Vec<ChatMessage> = values
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<MessageResponse>(value)
                    .map_err(|e| DomainError::DataError(e.to_string()))
                    .and_then(MessageResponse::into_domain)
                    .map_err(|e| warn!("[chat] skip malformed message: {}", e))
                    .ok()
            })
            .collect();

        if messages.len() < total {
            warn!(
                "[chat] dropped {} of {} messages",
                total - messages.len(),
                total
            );
        }
        messages
    }
}

/// `POST /chatrooms/{id}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedMessageResponse {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
}
