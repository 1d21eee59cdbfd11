pub mod task_event_repo;
pub mod task_repo;

pub use task_event_repo::TaskEventRepo;
pub use task_repo::TaskRepo;
