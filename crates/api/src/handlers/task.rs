//! Handlers for the `/tasks` resource.
//!
//! Status, event, and activity writes flow through the task lifecycle
//! service, which persists first and then notifies WebSocket subscribers.

use abrowser_core::types::TaskId;
use abrowser_core::{TaskEventType, TaskStatus};
use abrowser_db::models::{CreateTask, Task};
use abrowser_tasks::TaskWithEvents;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for task listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for task listing.
const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Body for `PUT /tasks/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: TaskStatus,
}

/// Body for `POST /tasks/{id}/events`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEventBody {
    #[serde(rename = "type")]
    pub event_type: TaskEventType,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// POST /api/v1/tasks
///
/// Create a new browser task in `pending` status.
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let task = state.tasks.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks
///
/// List tasks newest-first with pagination.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let tasks = state.tasks.list(limit, offset).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
///
/// Fetch a task with its recent event log, or 404 when unknown.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> AppResult<Json<DataResponse<TaskWithEvents>>> {
    let detail = state
        .tasks
        .get(id)
        .await?
        .ok_or(abrowser_tasks::TaskError::NotFound(id))?;

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/tasks/{id}/status
///
/// Transition a task's status. The durable write happens first; subscribers
/// then receive a `task-status-update` frame plus a derived `task-event`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state.tasks.update_status(id, body.status).await?;
    Ok(Json(DataResponse { data: task }))
}

/// POST /api/v1/tasks/{id}/events
///
/// Append an event to the task's log (execution-engine callback).
pub async fn log_event(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(body): Json<LogEventBody>,
) -> AppResult<(StatusCode, Json<DataResponse<abrowser_db::models::TaskEvent>>)> {
    let event = state
        .tasks
        .log_event(id, body.event_type, &body.message, body.data)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// POST /api/v1/tasks/{id}/activity
///
/// Relay a fine-grained progress signal to subscribers (execution-engine
/// callback). Nothing is stored; the response is 202 Accepted.
pub async fn record_activity(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(activity): Json<serde_json::Value>,
) -> AppResult<StatusCode> {
    state.tasks.record_activity(id, activity).await;
    Ok(StatusCode::ACCEPTED)
}
