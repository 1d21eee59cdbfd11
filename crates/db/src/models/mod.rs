pub mod task;
pub mod task_event;

pub use task::{CreateTask, Task};
pub use task_event::TaskEvent;
