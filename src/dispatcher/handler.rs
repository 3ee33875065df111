use async_trait::async_trait;

use crate::event::Envelope;

/// A consumer-registered handler, invoked once per matching published event.
///
/// Handlers receive the encoded wire envelope. A returned error is logged by
/// the dispatcher and does not affect other handlers or the publish result.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in diagnostics when the handler fails.
    fn name(&self) -> &str;

    async fn handle(&self, event: &Envelope) -> anyhow::Result<()>;
}

/// Adapter that lets a plain closure act as a named handler.
pub(crate) struct FnHandler<F> {
    name: String,
    func: F,
}

impl<F> FnHandler<F> {
    pub(crate) fn new(name: String, func: F) -> Self {
        Self { name, func }
    }
}

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&Envelope) -> anyhow::Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &Envelope) -> anyhow::Result<()> {
        (self.func)(event)
    }
}
