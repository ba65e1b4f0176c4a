mod auth_service;
mod chat_room_service;
mod session_context;

pub use auth_service::AuthService;
pub use chat_room_service::{ChatRoomService, ChatRoomView, RoomSnapshot};
pub use session_context::SessionContext;
