// Event model for the task bus.
//
// Kinds are a closed enumeration; payloads are typed per kind and carried on
// the wire as `{"type": "<kind>", "payload": {...}}`.

pub mod kinds;
pub mod types;

pub use kinds::EventKind;
pub use types::{
    Envelope, TaskAssignedData, TaskCommentAddedData, TaskCreatedData, TaskEvent, TaskStatus,
    TaskStatusChangedData,
};
