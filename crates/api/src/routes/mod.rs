pub mod health;
pub mod task;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                      WebSocket upgrade
///
/// /tasks                   list (GET), create (POST)
/// /tasks/{id}              task detail with recent events (GET)
/// /tasks/{id}/status       status transition (PUT)
/// /tasks/{id}/events       append event (POST, engine callback)
/// /tasks/{id}/activity     relay activity (POST, engine callback)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/tasks", task::router())
}
