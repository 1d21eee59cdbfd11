//! Task lifecycle service.
//!
//! Owns status transitions and event-log writes. Every mutation follows the
//! same two-step contract: the durable write must succeed first (and may
//! fail the whole operation); the notification fan-out is then attempted
//! exactly once through [`Dispatch`](abrowser_events::Dispatch) and its
//! outcome is never reported back to the caller.

pub mod service;
pub mod store;

pub use service::{TaskError, TaskService, TaskWithEvents};
pub use store::{PgTaskStore, TaskStore};
