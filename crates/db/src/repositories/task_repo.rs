//! Repository for the `tasks` table.

use abrowser_core::types::TaskId;
use abrowser_core::TaskStatus;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{CreateTask, Task};

/// Column list for `tasks` queries.
const COLUMNS: &str =
    "id, name, description, url, status, result, created_at, updated_at, completed_at";

/// Provides CRUD operations for browser tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task with status `pending`, returning the stored row.
    pub async fn insert(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (id, name, description, url, status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.url)
            .bind(TaskStatus::Pending)
            .fetch_one(pool)
            .await
    }

    /// Fetch a task by id.
    pub async fn get(pool: &PgPool, id: TaskId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks newest-first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a task's status in a single atomic statement.
    ///
    /// `updated_at` always advances; `completed_at` is only written on the
    /// first transition into a terminal status (`COALESCE` keeps an earlier
    /// completion time intact). Returns `None` when the task does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks \
             SET status = $2, \
                 updated_at = NOW(), \
                 completed_at = CASE \
                     WHEN $3 THEN COALESCE(completed_at, NOW()) \
                     ELSE completed_at \
                 END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .bind(status.is_terminal())
            .fetch_optional(pool)
            .await
    }
}
