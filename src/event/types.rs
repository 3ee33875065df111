use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::kinds::EventKind;

// ============================================================================
// Task Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::InReview => "in-review",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "backlog" => Some(TaskStatus::Backlog),
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "in-review" => Some(TaskStatus::InReview),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

// ============================================================================
// Event payloads
// ============================================================================

/// Data for task.created - emitted after a new task row is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCreatedData {
    /// The newly created task.
    pub task_id: Uuid,
    /// The user who created the task.
    pub creator_id: Uuid,
    /// Short, descriptive title of the task.
    pub title: String,
    /// Detailed description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

/// Data for task.assigned - emitted when a task is assigned to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignedData {
    /// The task being assigned.
    pub task_id: Uuid,
    /// The user the task is now assigned to.
    pub assignee_id: Uuid,
    /// The user who made the assignment.
    pub assigned_by: Uuid,
}

/// Data for task.status_changed - emitted when a task's status transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusChangedData {
    /// The task whose status changed.
    pub task_id: Uuid,
    /// The previous status.
    pub old_status: TaskStatus,
    /// The new status after the transition.
    pub new_status: TaskStatus,
}

/// Data for task.comment_added - emitted when a comment is added to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCommentAddedData {
    /// The task the comment belongs to.
    pub task_id: Uuid,
    /// The newly created comment.
    pub comment_id: Uuid,
    /// The user who wrote the comment.
    pub author_id: Uuid,
    /// The owner of the task, denormalized so consumers need no task lookup.
    pub task_owner_id: Uuid,
    /// Comment text.
    pub body: String,
}

// ============================================================================
// Task Event
// ============================================================================

/// A task lifecycle event with its typed payload.
///
/// Serialized with `#[serde(tag = "type", content = "payload")]`, so a typed
/// event and its wire [`Envelope`] share the same JSON shape:
/// `{"type": "task.created", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum TaskEvent {
    #[serde(rename = "task.created")]
    TaskCreated(TaskCreatedData),
    #[serde(rename = "task.assigned")]
    TaskAssigned(TaskAssignedData),
    #[serde(rename = "task.status_changed")]
    TaskStatusChanged(TaskStatusChangedData),
    #[serde(rename = "task.comment_added")]
    TaskCommentAdded(TaskCommentAddedData),
}

impl TaskEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TaskEvent::TaskCreated(_) => EventKind::TaskCreated,
            TaskEvent::TaskAssigned(_) => EventKind::TaskAssigned,
            TaskEvent::TaskStatusChanged(_) => EventKind::TaskStatusChanged,
            TaskEvent::TaskCommentAdded(_) => EventKind::TaskCommentAdded,
        }
    }

    /// Convert to the wire envelope.
    ///
    /// Goes through serde so the envelope's `type`/`payload` split always
    /// matches the serialization format of the enum itself.
    pub fn to_envelope(&self) -> std::result::Result<Envelope, serde_json::Error> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }

    /// Reconstruct a typed event from a wire envelope.
    pub fn from_envelope(envelope: &Envelope) -> std::result::Result<Self, serde_json::Error> {
        serde_json::to_value(envelope).and_then(serde_json::from_value)
    }
}

// ============================================================================
// Wire envelope
// ============================================================================

/// Wire form of a published event: `{"type": "<kind>", "payload": {...}}`.
///
/// This is the only byte format observable outside the dispatcher. Handlers
/// receive the envelope, never the producer's native value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: Value,
}

impl Envelope {
    /// Decode the payload into a typed value (e.g. [`TaskAssignedData`]).
    pub fn decode<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
