//! Real-time wire protocol and dispatch seam.
//!
//! This crate defines everything that crosses the WebSocket boundary:
//!
//! - [`ClientMessage`] — inbound subscription frames (`join-task`,
//!   `leave-task`).
//! - [`Notification`] — outbound server frames, one tagged variant per
//!   notification kind.
//! - [`Dispatch`] — the fire-and-forget delivery trait the task lifecycle
//!   service fans out through. Implementations must never surface delivery
//!   failures to callers.

pub mod dispatch;
pub mod notification;
pub mod protocol;

pub use dispatch::Dispatch;
pub use notification::{broadcast_frame, EventPayload, Notification};
pub use protocol::{task_group, ClientMessage};
