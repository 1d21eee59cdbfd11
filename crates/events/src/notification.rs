//! Outbound server frames.
//!
//! Every notification kind is a distinct [`Notification`] variant with its
//! own strongly-typed payload; serialization produces the
//! `{"event": <name>, "data": {...}}` envelope clients consume. Notifications
//! are ephemeral: the task-event log is the durable record, these frames are
//! its live projection.

use abrowser_core::types::{TaskId, Timestamp};
use abrowser_core::{TaskEventType, TaskStatus};
use serde::Serialize;
use serde_json::json;

/// An outbound frame scoped to a single connection, group, or broadcast.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum Notification {
    /// One-time welcome ack carrying the assigned connection id.
    Connection(ConnectionAck),
    /// Ack sent to the joining connection only.
    JoinedTask(JoinAck),
    /// A task changed status.
    TaskStatusUpdate(StatusUpdate),
    /// A task-event log row was written.
    TaskEvent(TaskEventMessage),
    /// Fine-grained progress signal; high frequency, never persisted.
    BrowserActivity(ActivityMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionAck {
    pub message: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinAck {
    pub task_id: TaskId,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub timestamp: Timestamp,
}

/// Body of a `task-event` frame: the event's fields merged beside the task id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEventMessage {
    pub task_id: TaskId,
    #[serde(flatten)]
    pub event: EventPayload,
}

/// The event fields carried by a `task-event` frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(rename = "type")]
    pub event_type: TaskEventType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: Timestamp,
}

/// Body of a `browser-activity` frame: the activity's own fields spread
/// beside the task id, mirroring the loosely-shaped signals the execution
/// engine emits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMessage {
    pub task_id: TaskId,
    #[serde(flatten)]
    pub activity: serde_json::Map<String, serde_json::Value>,
}

impl Notification {
    pub fn connection_ack(client_id: &str) -> Self {
        Notification::Connection(ConnectionAck {
            message: "Connected to browser-task updates".to_string(),
            client_id: client_id.to_string(),
        })
    }

    pub fn joined_task(task_id: TaskId) -> Self {
        Notification::JoinedTask(JoinAck {
            task_id,
            message: format!("Joined task {task_id} for real-time updates"),
        })
    }

    /// Status update stamped with the current time.
    pub fn status_update(task_id: TaskId, status: TaskStatus) -> Self {
        Notification::TaskStatusUpdate(StatusUpdate {
            task_id,
            status,
            timestamp: chrono::Utc::now(),
        })
    }

    pub fn task_event(task_id: TaskId, event: EventPayload) -> Self {
        Notification::TaskEvent(TaskEventMessage { task_id, event })
    }

    /// Wrap a free-form activity payload. Non-object payloads land under a
    /// single `detail` field so the frame stays an object.
    pub fn browser_activity(task_id: TaskId, activity: serde_json::Value) -> Self {
        let activity = match activity {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("detail".to_string(), other);
                map
            }
        };
        Notification::BrowserActivity(ActivityMessage { task_id, activity })
    }

    /// Serialize to the text form sent on the socket.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build a broadcast frame with a caller-chosen event name, e.g. system-wide
/// maintenance announcements. These are not task-scoped and carry no schema.
pub fn broadcast_frame(event: &str, data: serde_json::Value) -> String {
    json!({ "event": event, "data": data }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn status_update_envelope_shape() {
        let id = Uuid::new_v4();
        let text = Notification::status_update(id, TaskStatus::Running)
            .to_text()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["event"], "task-status-update");
        assert_eq!(value["data"]["taskId"], id.to_string());
        assert_eq!(value["data"]["status"], "running");
        assert!(value["data"]["timestamp"].is_string());
    }

    #[test]
    fn task_event_merges_fields_and_omits_missing_data() {
        let id = Uuid::new_v4();
        let event = EventPayload {
            event_type: TaskEventType::TaskCompleted,
            message: "Task status updated to completed".to_string(),
            data: None,
            timestamp: chrono::Utc::now(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&Notification::task_event(id, event).to_text().unwrap()).unwrap();

        assert_eq!(value["event"], "task-event");
        assert_eq!(value["data"]["type"], "TASK_COMPLETED");
        assert_eq!(value["data"]["taskId"], id.to_string());
        assert!(value["data"].get("data").is_none());
    }

    #[test]
    fn activity_fields_are_spread_beside_task_id() {
        let id = Uuid::new_v4();
        let activity = serde_json::json!({ "action": "click", "selector": "#submit" });
        let value: serde_json::Value = serde_json::from_str(
            &Notification::browser_activity(id, activity).to_text().unwrap(),
        )
        .unwrap();

        assert_eq!(value["event"], "browser-activity");
        assert_eq!(value["data"]["taskId"], id.to_string());
        assert_eq!(value["data"]["action"], "click");
        assert_eq!(value["data"]["selector"], "#submit");
    }

    #[test]
    fn non_object_activity_is_wrapped() {
        let id = Uuid::new_v4();
        let value: serde_json::Value = serde_json::from_str(
            &Notification::browser_activity(id, serde_json::json!("navigating"))
                .to_text()
                .unwrap(),
        )
        .unwrap();

        assert_eq!(value["data"]["detail"], "navigating");
    }

    #[test]
    fn welcome_ack_carries_client_id() {
        let value: serde_json::Value =
            serde_json::from_str(&Notification::connection_ack("abc-123").to_text().unwrap())
                .unwrap();

        assert_eq!(value["event"], "connection");
        assert_eq!(value["data"]["clientId"], "abc-123");
    }

    #[test]
    fn broadcast_frame_uses_caller_event_name() {
        let text = broadcast_frame("maintenance", serde_json::json!({ "msg": "restarting" }));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["event"], "maintenance");
        assert_eq!(value["data"]["msg"], "restarting");
    }
}
