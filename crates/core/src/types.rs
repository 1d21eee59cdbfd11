/// Browser tasks are keyed by UUID (v4, generated server-side).
pub type TaskId = uuid::Uuid;

/// Task-event rows use a PostgreSQL BIGSERIAL key.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
