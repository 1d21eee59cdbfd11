//! Task status and event-type enums.
//!
//! Both enums are stored as TEXT columns and travel on the wire, so the
//! string forms here are the single source of truth: statuses are
//! lowercase, event types SCREAMING_SNAKE_CASE. The sqlx impls delegate to
//! `&str` / `String` so the database sees plain text.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a browser task.
///
/// Transitions run `pending -> running -> {completed, failed}`;
/// `completed` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether this status ends the task's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// The event-log entry type derived from a transition into this status.
    ///
    /// Non-terminal statuses map to [`TaskEventType::TaskStarted`].
    pub fn derived_event_type(self) -> TaskEventType {
        match self {
            TaskStatus::Completed => TaskEventType::TaskCompleted,
            TaskStatus::Failed => TaskEventType::TaskFailed,
            TaskStatus::Running | TaskStatus::Pending => TaskEventType::TaskStarted,
        }
    }

    /// Wire/storage string form (`"pending"`, `"running"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown task status: {other}"
            ))),
        }
    }
}

/// Kind of an append-only task-event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskEventType {
    TaskStarted,
    TaskCompleted,
    TaskFailed,
    ActionExecuted,
    ErrorOccurred,
}

impl TaskEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskEventType::TaskStarted => "TASK_STARTED",
            TaskEventType::TaskCompleted => "TASK_COMPLETED",
            TaskEventType::TaskFailed => "TASK_FAILED",
            TaskEventType::ActionExecuted => "ACTION_EXECUTED",
            TaskEventType::ErrorOccurred => "ERROR_OCCURRED",
        }
    }
}

impl std::fmt::Display for TaskEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskEventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TASK_STARTED" => Ok(TaskEventType::TaskStarted),
            "TASK_COMPLETED" => Ok(TaskEventType::TaskCompleted),
            "TASK_FAILED" => Ok(TaskEventType::TaskFailed),
            "ACTION_EXECUTED" => Ok(TaskEventType::ActionExecuted),
            "ERROR_OCCURRED" => Ok(TaskEventType::ErrorOccurred),
            other => Err(CoreError::Validation(format!(
                "Unknown task event type: {other}"
            ))),
        }
    }
}

// sqlx glue: both enums are TEXT at the database boundary.

macro_rules! impl_text_sqlx {
    ($name:ident) => {
        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <&str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                text.parse().map_err(Into::into)
            }
        }
    };
}

impl_text_sqlx!(TaskStatus);
impl_text_sqlx!(TaskEventType);
