// Domain layer - activity aggregation, session and chat models
// No dependencies on infrastructure or presentation layers

pub mod activity;
pub mod chat;
pub mod events;
pub mod profile;
pub mod session;
pub mod shared;
pub mod validation;

// Re-exports for convenience
pub use events::DomainEvent;
pub use shared::{DomainError, MessageId, RoomId, UserId};
