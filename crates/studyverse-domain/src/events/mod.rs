use std::any::Any;

/// Base trait for all domain events
/// All events must be Send + Sync so they can cross task boundaries
pub trait DomainEvent: Send + Sync + Any {
    /// Convert to Any for type-safe downcasting
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Type name used as the routing key in the event bus
    fn event_type_name(&self) -> &'static str;
}

/// Implement DomainEvent for a concrete event type
macro_rules! impl_domain_event {
    ($type:ty) => {
        impl $crate::events::DomainEvent for $type {
            fn as_any(&self) -> &(dyn std::any::Any + Send + Sync) {
                self
            }

            fn event_type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
        }
    };
}

pub mod event_bus;
pub mod room_events;
pub mod session_events;

pub use event_bus::{DynamicEventHandler, EventBus, EventHandler, TypedEventHandlerWrapper};
pub use room_events::{MessageReceived, ParticipantsUpdated};
pub use session_events::{SessionEnded, SessionStarted};
