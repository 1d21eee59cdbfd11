//! Task-event entity model.

use abrowser_core::types::{DbId, TaskId, Timestamp};
use abrowser_core::TaskEventType;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `task_events` table. Append-only; rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    pub id: DbId,
    pub task_id: TaskId,
    pub event_type: TaskEventType,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub created_at: Timestamp,
}
