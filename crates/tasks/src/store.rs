//! Persistence seam for the task lifecycle service.
//!
//! [`TaskStore`] mirrors the storage operations the service needs; each call
//! is atomic. [`PgTaskStore`] is the production implementation over the
//! repository layer.

use abrowser_core::types::TaskId;
use abrowser_core::{TaskEventType, TaskStatus};
use abrowser_db::models::{CreateTask, Task, TaskEvent};
use abrowser_db::repositories::{TaskEventRepo, TaskRepo};
use abrowser_db::DbPool;
use async_trait::async_trait;

/// Atomic storage operations for tasks and their event log.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, input: &CreateTask) -> Result<Task, sqlx::Error>;

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, sqlx::Error>;

    async fn list_tasks(&self, limit: i64, offset: i64) -> Result<Vec<Task>, sqlx::Error>;

    /// Persist a status change. Advances `updated_at`; writes `completed_at`
    /// only on the first terminal transition. `None` when the task is
    /// unknown.
    async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error>;

    /// Append an immutable event row.
    async fn append_task_event(
        &self,
        task_id: TaskId,
        event_type: TaskEventType,
        message: &str,
        data: Option<&serde_json::Value>,
    ) -> Result<TaskEvent, sqlx::Error>;

    async fn list_task_events(
        &self,
        task_id: TaskId,
        limit: i64,
    ) -> Result<Vec<TaskEvent>, sqlx::Error>;
}

/// PostgreSQL-backed store delegating to the repository layer.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: DbPool,
}

impl PgTaskStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create_task(&self, input: &CreateTask) -> Result<Task, sqlx::Error> {
        TaskRepo::insert(&self.pool, input).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, sqlx::Error> {
        TaskRepo::get(&self.pool, id).await
    }

    async fn list_tasks(&self, limit: i64, offset: i64) -> Result<Vec<Task>, sqlx::Error> {
        TaskRepo::list(&self.pool, limit, offset).await
    }

    async fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        TaskRepo::update_status(&self.pool, id, status).await
    }

    async fn append_task_event(
        &self,
        task_id: TaskId,
        event_type: TaskEventType,
        message: &str,
        data: Option<&serde_json::Value>,
    ) -> Result<TaskEvent, sqlx::Error> {
        TaskEventRepo::insert(&self.pool, task_id, event_type, message, data).await
    }

    async fn list_task_events(
        &self,
        task_id: TaskId,
        limit: i64,
    ) -> Result<Vec<TaskEvent>, sqlx::Error> {
        TaskEventRepo::list_for_task(&self.pool, task_id, limit).await
    }
}
