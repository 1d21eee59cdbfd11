//! WebSocket infrastructure for real-time task notifications.
//!
//! Provides connection and group management, the HTTP upgrade handler,
//! heartbeat monitoring, and the [`WsGateway`] dispatch implementation
//! the task lifecycle service fans out through.

pub mod gateway;
mod handler;
mod heartbeat;
pub mod manager;

pub use gateway::WsGateway;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
