//! Repository for the append-only `task_events` table.

use abrowser_core::types::TaskId;
use abrowser_core::TaskEventType;
use sqlx::PgPool;

use crate::models::task_event::TaskEvent;

/// Column list for `task_events` queries.
const COLUMNS: &str = "id, task_id, event_type, message, data, created_at";

/// Provides insert/list operations for task events. Rows are immutable.
pub struct TaskEventRepo;

impl TaskEventRepo {
    /// Append an event row, returning the stored record.
    pub async fn insert(
        pool: &PgPool,
        task_id: TaskId,
        event_type: TaskEventType,
        message: &str,
        data: Option<&serde_json::Value>,
    ) -> Result<TaskEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_events (task_id, event_type, message, data) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskEvent>(&query)
            .bind(task_id)
            .bind(event_type)
            .bind(message)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// List a task's events newest-first.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: TaskId,
        limit: i64,
    ) -> Result<Vec<TaskEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_events \
             WHERE task_id = $1 ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, TaskEvent>(&query)
            .bind(task_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
