//! Commands exposed to the presentation layer.
//!
//! Each takes the shared `AppState`, returns a serializable DTO and maps
//! domain failures to `CommandError`.

use serde::{Deserialize, Serialize};

use crate::application::dtos::{
    ActivityOverviewDto, ChatMessageDto, ChatRoomDto, ParticipantDto, SessionDto, StreakDto,
};
use crate::presentation::error::CommandError;
use crate::presentation::state::AppState;
use studyverse_domain::session::Registration;
use studyverse_domain::shared::RoomId;

/// Messages and participants of a room at the time it was read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomActivityDto {
    pub room_id: String,
    pub messages: Vec<ChatMessageDto>,
    pub participants: Vec<ParticipantDto>,
}

async fn resolve_user_id(state: &AppState, user_id: Option<String>) -> Result<String, CommandError> {
    match user_id {
        Some(id) => Ok(id),
        None => Ok(state
            .session
            .require_user_id()
            .await?
            .to_string()),
    }
}

// ============================================================
// Activity
// ============================================================

/// Activity overview of a user, the signed-in one by default
pub async fn get_activity_overview(
    state: &AppState,
    user_id: Option<String>,
) -> Result<ActivityOverviewDto, CommandError> {
    let user_id = resolve_user_id(state, user_id).await?;
    state
        .queries
        .activity
        .get_overview(&user_id)
        .await
        .map_err(CommandError::from)
}

pub async fn get_activity_streaks(
    state: &AppState,
    user_id: Option<String>,
) -> Result<StreakDto, CommandError> {
    let user_id = resolve_user_id(state, user_id).await?;
    state
        .queries
        .activity
        .get_streaks(&user_id)
        .await
        .map_err(CommandError::from)
}

// ============================================================
// Session
// ============================================================

pub async fn login(
    state: &AppState,
    email: String,
    password: String,
) -> Result<SessionDto, CommandError> {
    let session = state.services.auth.login(&email, &password).await?;
    Ok(SessionDto::from(&session))
}

pub async fn logout(state: &AppState) -> Result<(), CommandError> {
    state.services.auth.logout().await.map_err(CommandError::from)
}

pub async fn current_session(state: &AppState) -> Result<Option<SessionDto>, CommandError> {
    Ok(state
        .session
        .current()
        .await
        .filter(|s| s.is_valid())
        .as_ref()
        .map(SessionDto::from))
}

pub async fn register(
    state: &AppState,
    name: String,
    email: String,
    password: String,
) -> Result<(), CommandError> {
    let registration = Registration {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password,
    };
    state
        .services
        .auth
        .register(&registration)
        .await
        .map_err(CommandError::from)
}

pub async fn reset_password(state: &AppState, email: String) -> Result<(), CommandError> {
    state
        .services
        .auth
        .reset_password(&email)
        .await
        .map_err(CommandError::from)
}

pub async fn update_password(
    state: &AppState,
    token: String,
    new_password: String,
) -> Result<(), CommandError> {
    state
        .services
        .auth
        .update_password(&token, &new_password)
        .await
        .map_err(CommandError::from)
}

// ============================================================
// Chatrooms
// ============================================================

pub async fn list_chatrooms(state: &AppState) -> Result<Vec<ChatRoomDto>, CommandError> {
    let rooms = state.services.chat.list_rooms().await?;
    Ok(rooms.iter().map(ChatRoomDto::from).collect())
}

pub async fn create_chatroom(
    state: &AppState,
    name: String,
    image: Option<String>,
) -> Result<(), CommandError> {
    state
        .services
        .chat
        .create_room(&name, image.as_deref())
        .await
        .map_err(CommandError::from)
}

/// Open a room, read what it shows, and leave again
pub async fn get_room_activity(
    state: &AppState,
    room_id: String,
) -> Result<RoomActivityDto, CommandError> {
    let room_id = RoomId::from_string(&room_id);
    let view = state.services.chat.open_room(&room_id).await?;
    let snapshot = view.snapshot().await;
    view.close().await?;

    Ok(RoomActivityDto {
        room_id: room_id.to_string(),
        messages: snapshot.messages.iter().map(ChatMessageDto::from).collect(),
        participants: snapshot
            .participants
            .iter()
            .map(ParticipantDto::from)
            .collect(),
    })
}

pub async fn send_chat_message(
    state: &AppState,
    room_id: String,
    text: String,
) -> Result<ChatMessageDto, CommandError> {
    let room_id = RoomId::from_string(&room_id);
    let view = state.services.chat.open_room(&room_id).await?;

    let sent = view.send(&text).await;
    view.close().await?;

    Ok(ChatMessageDto::from(&sent?))
}

// ============================================================
// Diagnostics
// ============================================================

pub fn get_log_dir() -> Option<String> {
    studyverse_infrastructure::logging::get_log_dir().map(|p| p.display().to_string())
}
