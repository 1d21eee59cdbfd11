//! Fire-and-forget delivery seam.

use abrowser_core::types::TaskId;
use abrowser_core::TaskStatus;
use async_trait::async_trait;

use crate::notification::EventPayload;

/// Delivery primitives the task lifecycle service fans out through.
///
/// Every method is best-effort: no return value, no delivery confirmation,
/// no retry. Implementations swallow transport errors and the zero-subscriber
/// case; the durable task-event log is the source of truth for anything a
/// client must not miss.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Deliver a `task-status-update` frame to the task's group.
    async fn notify_status(&self, task_id: TaskId, status: TaskStatus);

    /// Deliver a `task-event` frame to the task's group.
    async fn notify_event(&self, task_id: TaskId, event: EventPayload);

    /// Deliver a `browser-activity` frame to the task's group.
    async fn notify_activity(&self, task_id: TaskId, activity: serde_json::Value);

    /// Deliver a free-form frame to every connection regardless of groups.
    async fn broadcast_all(&self, event: &str, data: serde_json::Value);
}
