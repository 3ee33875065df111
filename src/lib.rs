//! In-process event dispatcher for task lifecycle events.
//!
//! Producers (task use-cases) publish typed events after a state-changing
//! domain operation; consumers (notification senders, log sinks) register
//! handlers per event kind. Delivery is best-effort: a failing handler is
//! logged and skipped, and never fails the publish or other handlers.
//!
//! The [`EventBus`] trait is the seam where a real broker would later be
//! substituted; [`Dispatcher`] is the in-process implementation.

pub mod dispatcher;
pub mod event;
pub mod subscribers;

use thiserror::Error;

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum DispatchError {
    /// The payload could not be encoded to the JSON wire form. No handlers
    /// ran for that publish.
    #[error("failed to encode event payload: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The dispatcher was closed during shutdown.
    #[error("dispatcher is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, DispatchError>;

// ============================================================================
// Public re-exports
// ============================================================================

pub use dispatcher::{Dispatcher, EventBus, EventHandler};
pub use event::{Envelope, EventKind, TaskEvent};
