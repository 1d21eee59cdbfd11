//! Task entity model and DTOs.

use abrowser_core::types::{TaskId, Timestamp};
use abrowser_core::TaskStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: TaskStatus,
    /// Final result payload written by the execution engine, if any.
    pub result: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Set exactly once, on the first transition into a terminal status.
    pub completed_at: Option<Timestamp>,
}

/// DTO for creating a new task via `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(url)]
    pub url: String,
}
