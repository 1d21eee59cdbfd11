use std::sync::Arc;

use abrowser_tasks::TaskService;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: abrowser_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (registry + task groups).
    pub ws_manager: Arc<WsManager>,
    /// Task lifecycle service (persist-then-notify).
    pub tasks: Arc<TaskService>,
}
