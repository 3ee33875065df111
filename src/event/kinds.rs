use serde::{Deserialize, Serialize};

/// Closed set of recognized event kinds.
///
/// String forms follow the `<category>.<action>` taxonomy and are the values
/// that appear in logs and in the wire envelope's `type` field. Adding a kind
/// is a code change; the set is not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "task.created")]
    TaskCreated,
    #[serde(rename = "task.assigned")]
    TaskAssigned,
    #[serde(rename = "task.status_changed")]
    TaskStatusChanged,
    #[serde(rename = "task.comment_added")]
    TaskCommentAdded,
}

impl EventKind {
    /// Every recognized kind, in a stable order.
    pub const ALL: [EventKind; 4] = [
        EventKind::TaskCreated,
        EventKind::TaskAssigned,
        EventKind::TaskStatusChanged,
        EventKind::TaskCommentAdded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TaskCreated => "task.created",
            EventKind::TaskAssigned => "task.assigned",
            EventKind::TaskStatusChanged => "task.status_changed",
            EventKind::TaskCommentAdded => "task.comment_added",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task.created" => Some(EventKind::TaskCreated),
            "task.assigned" => Some(EventKind::TaskAssigned),
            "task.status_changed" => Some(EventKind::TaskStatusChanged),
            "task.comment_added" => Some(EventKind::TaskCommentAdded),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_str("task.deleted"), None);
    }

    #[test]
    fn test_kinds_format() {
        // Every kind follows the namespace.action format
        for kind in EventKind::ALL {
            assert!(kind.as_str().starts_with("task."));
        }
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&EventKind::TaskStatusChanged).unwrap();
        assert_eq!(json, r#""task.status_changed""#);

        let kind: EventKind = serde_json::from_str(r#""task.assigned""#).unwrap();
        assert_eq!(kind, EventKind::TaskAssigned);
    }
}
