//! Shared domain types for the browser-task dashboard backend.
//!
//! Holds the task status/event enums, common type aliases, and the
//! domain-level error type used across the workspace crates.

pub mod error;
pub mod task;
pub mod types;

pub use error::CoreError;
pub use task::{TaskEventType, TaskStatus};
