//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /               -> list_tasks
/// POST   /               -> create_task
/// GET    /{id}           -> get_task
/// PUT    /{id}/status    -> update_status
/// POST   /{id}/events    -> log_event
/// POST   /{id}/activity  -> record_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list_tasks).post(task::create_task))
        .route("/{id}", get(task::get_task))
        .route("/{id}/status", put(task::update_status))
        .route("/{id}/events", post(task::log_event))
        .route("/{id}/activity", post(task::record_activity))
}
