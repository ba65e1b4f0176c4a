use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use super::DomainEvent;
use crate::shared::{DomainError, SubscriptionId};

/// Event bus with an explicit handler registry.
///
/// Every subscription gets its own id; once `unsubscribe` returns, the
/// handler is not invoked again, even for events already in flight.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a domain event to every active handler of its type
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError>;

    /// Register a handler for the event type it declares
    async fn subscribe(
        &self,
        handler: Arc<dyn DynamicEventHandler>,
    ) -> Result<SubscriptionId, DomainError>;

    /// Remove a handler. Returns false if the id was not registered.
    async fn unsubscribe(&self, id: &SubscriptionId) -> bool;
}

/// Event handler trait for handling specific event types
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    /// Handle a domain event
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}

/// Type-erased event handler for storage in collections
#[async_trait]
pub trait DynamicEventHandler: Send + Sync {
    /// Handle any domain event (type-erased)
    async fn handle_dynamic(&self, event: &(dyn Any + Send + Sync)) -> Result<(), DomainError>;

    /// Get the type name this handler handles
    fn event_type_name(&self) -> &'static str;
}

/// Wrapper to convert typed EventHandler to DynamicEventHandler
pub struct TypedEventHandlerWrapper<E: DomainEvent + 'static, H: EventHandler<E>> {
    handler: H,
    _phantom: std::marker::PhantomData<fn(E)>,
}

impl<E: DomainEvent + 'static, H: EventHandler<E>> TypedEventHandlerWrapper<E, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn shared(handler: H) -> Arc<dyn DynamicEventHandler>
    where
        H: 'static,
    {
        Arc::new(Self::new(handler))
    }
}

#[async_trait]
impl<E: DomainEvent + 'static, H: EventHandler<E>> DynamicEventHandler
    for TypedEventHandlerWrapper<E, H>
{
    async fn handle_dynamic(&self, event: &(dyn Any + Send + Sync)) -> Result<(), DomainError> {
        if let Some(typed_event) = event.downcast_ref::<E>() {
            self.handler.handle(typed_event).await
        } else {
            Err(DomainError::Infrastructure(
                "Event type mismatch".to_string(),
            ))
        }
    }

    fn event_type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }
}
