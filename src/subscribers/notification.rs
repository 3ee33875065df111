use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::dispatcher::{EventBus, EventHandler};
use crate::event::{Envelope, EventKind, TaskAssignedData, TaskCommentAddedData};

// ============================================================================
// Collaborator traits
// ============================================================================

/// Lookup of user display names, backed by the account store elsewhere in
/// the backend.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user's display name; `None` when the user does not exist.
    async fn display_name(&self, user_id: Uuid) -> anyhow::Result<Option<String>>;
}

/// Delivery channel for rendered notifications (mail, web push, ...).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, recipient: Uuid, message: &str) -> anyhow::Result<()>;
}

// ============================================================================
// Notifier
// ============================================================================

/// Sends notifications for assignment and comment events.
///
/// Failures (unknown user, channel down) surface as handler errors: the
/// dispatcher logs them and other subscribers still run.
pub struct Notifier {
    directory: Arc<dyn UserDirectory>,
    channel: Arc<dyn NotificationChannel>,
}

impl Notifier {
    pub fn new(directory: Arc<dyn UserDirectory>, channel: Arc<dyn NotificationChannel>) -> Self {
        Self { directory, channel }
    }

    /// Subscribe to the kinds this sender cares about.
    pub async fn register(self, bus: &dyn EventBus) -> Result<()> {
        let notifier = Arc::new(self);
        bus.subscribe(EventKind::TaskAssigned, notifier.clone())
            .await?;
        bus.subscribe(EventKind::TaskCommentAdded, notifier).await?;
        Ok(())
    }

    async fn resolve_name(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.directory
            .display_name(user_id)
            .await?
            .with_context(|| format!("unknown user {user_id}"))
    }

    async fn on_assigned(&self, data: TaskAssignedData) -> anyhow::Result<()> {
        let assigner = self.resolve_name(data.assigned_by).await?;
        let message = format!("{assigner} assigned you task {}", data.task_id);
        self.channel.deliver(data.assignee_id, &message).await
    }

    async fn on_comment(&self, data: TaskCommentAddedData) -> anyhow::Result<()> {
        // Self-comments need no notification.
        if data.author_id == data.task_owner_id {
            return Ok(());
        }
        let author = self.resolve_name(data.author_id).await?;
        let message = format!("{author} commented on task {}: {}", data.task_id, data.body);
        self.channel.deliver(data.task_owner_id, &message).await
    }
}

#[async_trait]
impl EventHandler for Notifier {
    fn name(&self) -> &str {
        "notifier"
    }

    async fn handle(&self, event: &Envelope) -> anyhow::Result<()> {
        match event.kind {
            EventKind::TaskAssigned => self.on_assigned(event.decode()?).await,
            EventKind::TaskCommentAdded => self.on_comment(event.decode()?).await,
            // Registered only for the two kinds above; anything else is a no-op.
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dispatcher;
    use crate::event::{TaskEvent, TaskStatus, TaskStatusChangedData};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedDirectory {
        names: HashMap<Uuid, String>,
    }

    #[async_trait]
    impl UserDirectory for FixedDirectory {
        async fn display_name(&self, user_id: Uuid) -> anyhow::Result<Option<String>> {
            Ok(self.names.get(&user_id).cloned())
        }
    }

    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<(Uuid, String)>>,
    }

    #[async_trait]
    impl NotificationChannel for RecordingChannel {
        async fn deliver(&self, recipient: Uuid, message: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push((recipient, message.to_string()));
            Ok(())
        }
    }

    fn notifier_with(
        names: HashMap<Uuid, String>,
    ) -> (Notifier, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::default());
        let notifier = Notifier::new(
            Arc::new(FixedDirectory { names }),
            channel.clone(),
        );
        (notifier, channel)
    }

    #[tokio::test]
    async fn test_assignment_notifies_assignee() {
        let assigner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let task_id = Uuid::new_v4();

        let (notifier, channel) =
            notifier_with(HashMap::from([(assigner, "Alex".to_string())]));

        let bus = Dispatcher::new();
        notifier.register(&bus).await.unwrap();

        bus.publish_event(&TaskEvent::TaskAssigned(TaskAssignedData {
            task_id,
            assignee_id: assignee,
            assigned_by: assigner,
        }))
        .await
        .unwrap();

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, assignee);
        assert_eq!(sent[0].1, format!("Alex assigned you task {task_id}"));
    }

    #[tokio::test]
    async fn test_comment_notifies_task_owner() {
        let author = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let task_id = Uuid::new_v4();

        let (notifier, channel) =
            notifier_with(HashMap::from([(author, "Sam".to_string())]));

        let bus = Dispatcher::new();
        notifier.register(&bus).await.unwrap();

        bus.publish_event(&TaskEvent::TaskCommentAdded(TaskCommentAddedData {
            task_id,
            comment_id: Uuid::new_v4(),
            author_id: author,
            task_owner_id: owner,
            body: "looks good".to_string(),
        }))
        .await
        .unwrap();

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, owner);
        assert!(sent[0].1.contains("looks good"));
    }

    #[tokio::test]
    async fn test_self_comment_is_skipped() {
        let author = Uuid::new_v4();

        let (notifier, channel) =
            notifier_with(HashMap::from([(author, "Sam".to_string())]));

        let bus = Dispatcher::new();
        notifier.register(&bus).await.unwrap();

        bus.publish_event(&TaskEvent::TaskCommentAdded(TaskCommentAddedData {
            task_id: Uuid::new_v4(),
            comment_id: Uuid::new_v4(),
            author_id: author,
            task_owner_id: author,
            body: "note to self".to_string(),
        }))
        .await
        .unwrap();

        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_swallowed_by_dispatch() {
        // Directory has no entry for the assigner: the handler errors, the
        // publish still succeeds and nothing is delivered.
        let (notifier, channel) = notifier_with(HashMap::new());

        let bus = Dispatcher::new();
        notifier.register(&bus).await.unwrap();

        bus.publish_event(&TaskEvent::TaskAssigned(TaskAssignedData {
            task_id: Uuid::new_v4(),
            assignee_id: Uuid::new_v4(),
            assigned_by: Uuid::new_v4(),
        }))
        .await
        .unwrap();

        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ignores_other_kinds() {
        let (notifier, channel) = notifier_with(HashMap::new());

        let bus = Dispatcher::new();
        notifier.register(&bus).await.unwrap();

        bus.publish_event(&TaskEvent::TaskStatusChanged(TaskStatusChangedData {
            task_id: Uuid::new_v4(),
            old_status: TaskStatus::Todo,
            new_status: TaskStatus::Done,
        }))
        .await
        .unwrap();

        assert!(channel.sent.lock().unwrap().is_empty());
    }
}
