//! `Dispatch` implementation over the connection manager.
//!
//! Fans typed notifications out to the relevant task group, or to every
//! connection for broadcast frames. All delivery is best-effort: zero
//! subscribers and dead channels are normal, serialization failures are
//! logged and dropped. Nothing here ever reports back to the caller.

use std::sync::Arc;

use abrowser_core::types::TaskId;
use abrowser_core::TaskStatus;
use abrowser_events::{broadcast_frame, task_group, Dispatch, EventPayload, Notification};
use async_trait::async_trait;
use axum::extract::ws::Message;

use crate::ws::manager::WsManager;

/// Delivers task notifications through the WebSocket connection manager.
pub struct WsGateway {
    manager: Arc<WsManager>,
}

impl WsGateway {
    pub fn new(manager: Arc<WsManager>) -> Self {
        Self { manager }
    }

    /// Serialize and deliver a frame to the task's group.
    async fn send_to_task(&self, task_id: TaskId, notification: Notification) {
        let text = match notification.to_text() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "Failed to serialize notification");
                return;
            }
        };

        let group = task_group(task_id);
        let delivered = self
            .manager
            .send_to_group(&group, Message::Text(text.into()))
            .await;
        tracing::debug!(group = %group, delivered, "Dispatched task notification");
    }
}

#[async_trait]
impl Dispatch for WsGateway {
    async fn notify_status(&self, task_id: TaskId, status: TaskStatus) {
        self.send_to_task(task_id, Notification::status_update(task_id, status))
            .await;
    }

    async fn notify_event(&self, task_id: TaskId, event: EventPayload) {
        self.send_to_task(task_id, Notification::task_event(task_id, event))
            .await;
    }

    async fn notify_activity(&self, task_id: TaskId, activity: serde_json::Value) {
        self.send_to_task(task_id, Notification::browser_activity(task_id, activity))
            .await;
    }

    async fn broadcast_all(&self, event: &str, data: serde_json::Value) {
        let text = broadcast_frame(event, data);
        self.manager.broadcast(Message::Text(text.into())).await;
        tracing::debug!(event, "Broadcast frame delivered");
    }
}
