//! Inbound client frames and group naming.

use abrowser_core::types::TaskId;
use serde::Deserialize;

/// A text frame sent by a client, e.g.
/// `{"event": "join-task", "data": {"taskId": "..."}}`.
///
/// Unknown event names and malformed payloads fail to parse; the connection
/// handler logs and ignores them without closing the socket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinTask(TaskRef),
    LeaveTask(TaskRef),
}

/// Payload carrying the task a subscription frame refers to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: TaskId,
}

impl ClientMessage {
    /// Parse a raw text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Derive the subscriber-group name for a task (`task-{taskId}`).
pub fn task_group(task_id: TaskId) -> String {
    format!("task-{task_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn parses_join_task() {
        let id = Uuid::new_v4();
        let frame = format!(r#"{{"event":"join-task","data":{{"taskId":"{id}"}}}}"#);

        let msg = ClientMessage::parse(&frame).unwrap();
        assert_eq!(msg, ClientMessage::JoinTask(TaskRef { task_id: id }));
    }

    #[test]
    fn parses_leave_task() {
        let id = Uuid::new_v4();
        let frame = format!(r#"{{"event":"leave-task","data":{{"taskId":"{id}"}}}}"#);

        let msg = ClientMessage::parse(&frame).unwrap();
        assert_eq!(msg, ClientMessage::LeaveTask(TaskRef { task_id: id }));
    }

    #[test]
    fn rejects_unknown_event_and_malformed_payloads() {
        assert!(ClientMessage::parse(r#"{"event":"self-destruct","data":{}}"#).is_err());
        assert!(ClientMessage::parse(r#"{"event":"join-task","data":{}}"#).is_err());
        assert!(ClientMessage::parse(r#"{"event":"join-task","data":{"taskId":"nope"}}"#).is_err());
        assert!(ClientMessage::parse("not json").is_err());
    }

    #[test]
    fn group_name_is_prefixed_task_id() {
        let id = Uuid::new_v4();
        assert_eq!(task_group(id), format!("task-{id}"));
    }
}
