use async_trait::async_trait;
use log::{debug, error};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use studyverse_domain::events::{DomainEvent, DynamicEventHandler, EventBus};
use studyverse_domain::shared::{DomainError, SubscriptionId};

struct Registration {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    handler: Arc<dyn DynamicEventHandler>,
}

/// In-memory event bus.
///
/// Handlers run one after another on the publishing task. A handler that
/// fails is logged and the rest still run. Unsubscribing flips the
/// registration's flag before it is removed, so a publish that already
/// took its snapshot skips the handler too.
pub struct InMemoryEventBus {
    handlers: Arc<RwLock<HashMap<&'static str, Vec<Registration>>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of handlers for a specific event type
    pub async fn handler_count<E: DomainEvent + 'static>(&self) -> usize {
        let event_type_name = std::any::type_name::<E>();
        let handlers = self.handlers.read().await;
        handlers.get(event_type_name).map_or(0, |h| h.len())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let event_type_name = event.event_type_name();

        // Snapshot so handlers may subscribe or unsubscribe while we dispatch
        let snapshot: Vec<(Arc<AtomicBool>, Arc<dyn DynamicEventHandler>)> = {
            let handlers = self.handlers.read().await;
            handlers
                .get(event_type_name)
                .map(|regs| {
                    regs.iter()
                        .map(|r| (r.active.clone(), r.handler.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };

        if snapshot.is_empty() {
            debug!("No handlers registered for event type: {}", event_type_name);
            return Ok(());
        }

        debug!(
            "Publishing {} to {} handlers",
            event_type_name,
            snapshot.len()
        );

        for (active, handler) in snapshot {
            if !active.load(Ordering::SeqCst) {
                continue;
            }
            if let Err(e) = handler.handle_dynamic(event.as_any()).await {
                error!("Handler failed to process event {}: {}", event_type_name, e);
            }
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        handler: Arc<dyn DynamicEventHandler>,
    ) -> Result<SubscriptionId, DomainError> {
        let event_type_name = handler.event_type_name();
        let id = SubscriptionId::new();

        let mut handlers = self.handlers.write().await;
        handlers.entry(event_type_name).or_default().push(Registration {
            id: id.clone(),
            active: Arc::new(AtomicBool::new(true)),
            handler,
        });

        debug!("Subscribed {} for event type: {}", id, event_type_name);
        Ok(id)
    }

    async fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().await;

        for registrations in handlers.values_mut() {
            if let Some(pos) = registrations.iter().position(|r| &r.id == id) {
                let removed = registrations.remove(pos);
                removed.active.store(false, Ordering::SeqCst);
                debug!("Unsubscribed {}", id);
                return true;
            }
        }

        false
    }
}
