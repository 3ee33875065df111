use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::dispatcher::{EventBus, EventHandler};
use crate::event::{Envelope, EventKind};

/// Logs every event that crosses the bus.
///
/// Diagnostics tap: register it before other subscribers so the log line
/// precedes their side effects.
pub struct EventLogger;

impl EventLogger {
    /// Subscribe a shared logger to every recognized kind.
    pub async fn register(bus: &dyn EventBus) -> Result<()> {
        let logger = Arc::new(EventLogger);
        for kind in EventKind::ALL {
            bus.subscribe(kind, logger.clone()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for EventLogger {
    fn name(&self) -> &str {
        "event-logger"
    }

    async fn handle(&self, event: &Envelope) -> anyhow::Result<()> {
        info!(kind = event.kind.as_str(), payload = %event.payload, "event");
        Ok(())
    }
}
