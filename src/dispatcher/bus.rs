use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::handler::{EventHandler, FnHandler};
use crate::event::{Envelope, EventKind, TaskEvent};
use crate::{DispatchError, Result};

// ============================================================================
// Event Bus trait
// ============================================================================

/// Capability interface for publishing and subscribing to task events.
///
/// [`Dispatcher`] is the in-process implementation. A future queue-backed
/// implementation can be substituted behind this trait without touching
/// producer or consumer code.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a typed event to all handlers registered for its kind.
    async fn publish_event(&self, event: &TaskEvent) -> Result<()>;

    /// Register a handler for `kind`. Handlers for the same kind run in
    /// registration order; registering the same handler twice means two
    /// invocations per publish.
    async fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Result<()>;

    /// Mark the bus closed. Idempotent; subsequent publishes and
    /// subscriptions fail with [`DispatchError::Closed`].
    async fn close(&self) -> Result<()>;
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Registry state behind a single lock so the closed flag and the handler
/// table are always observed together.
struct Registry {
    closed: bool,
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

/// In-process event dispatcher.
///
/// Fan-out is sequential on the caller's task: `publish` awaits every handler
/// registered for the kind, in registration order, and does not return until
/// all of them ran. Handler failures are logged and swallowed; only encoding
/// failures propagate to the producer. Ordering is guaranteed within a kind,
/// not across kinds.
pub struct Dispatcher {
    registry: RwLock<Registry>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry {
                closed: false,
                handlers: HashMap::new(),
            }),
        }
    }

    /// Publish an arbitrary payload under the given kind.
    ///
    /// The payload is encoded to the JSON wire envelope before any handler
    /// runs; an unencodable payload fails the publish with zero invocations.
    pub async fn publish<T>(&self, kind: EventKind, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)?;
        self.dispatch(Envelope { kind, payload }).await
    }

    /// Publish a typed event. Producers should prefer this over raw payloads.
    pub async fn publish_event(&self, event: &TaskEvent) -> Result<()> {
        let envelope = event.to_envelope()?;
        self.dispatch(envelope).await
    }

    /// Register a handler for `kind`.
    pub async fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Result<()> {
        let mut registry = self.registry.write().await;
        if registry.closed {
            return Err(DispatchError::Closed);
        }
        registry.handlers.entry(kind).or_default().push(handler);
        Ok(())
    }

    /// Register a plain closure as a named handler.
    pub async fn subscribe_fn<F>(
        &self,
        kind: EventKind,
        name: impl Into<String>,
        func: F,
    ) -> Result<()>
    where
        F: Fn(&Envelope) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(FnHandler::new(name.into(), func)))
            .await
    }

    /// Close the dispatcher. Safe to call more than once.
    ///
    /// Releases no handler resources today; this is the teardown seam for a
    /// future transport-backed bus.
    pub async fn close(&self) -> Result<()> {
        let mut registry = self.registry.write().await;
        if !registry.closed {
            registry.closed = true;
            info!("event dispatcher closed");
        }
        Ok(())
    }

    async fn dispatch(&self, envelope: Envelope) -> Result<()> {
        let encoded = serde_json::to_string(&envelope)?;

        // Snapshot under the read lock; the lock is not held while handlers
        // run, so a slow handler never blocks concurrent subscribes.
        let handlers = {
            let registry = self.registry.read().await;
            if registry.closed {
                return Err(DispatchError::Closed);
            }
            registry
                .handlers
                .get(&envelope.kind)
                .cloned()
                .unwrap_or_default()
        };

        debug!(kind = envelope.kind.as_str(), %encoded, "publishing event");

        for handler in &handlers {
            if let Err(e) = handler.handle(&envelope).await {
                warn!(
                    kind = envelope.kind.as_str(),
                    handler = handler.name(),
                    error = %e,
                    "event handler failed; continuing dispatch"
                );
            }
        }

        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for Dispatcher {
    async fn publish_event(&self, event: &TaskEvent) -> Result<()> {
        Dispatcher::publish_event(self, event).await
    }

    async fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Result<()> {
        Dispatcher::subscribe(self, kind, handler).await
    }

    async fn close(&self) -> Result<()> {
        Dispatcher::close(self).await
    }
}
