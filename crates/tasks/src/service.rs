//! Task lifecycle service: persist first, then notify.

use std::sync::Arc;

use abrowser_core::types::TaskId;
use abrowser_core::{TaskEventType, TaskStatus};
use abrowser_db::models::{CreateTask, Task, TaskEvent};
use abrowser_events::{Dispatch, EventPayload};
use serde::Serialize;

use crate::store::TaskStore;

/// Number of recent events returned with a task detail.
const DETAIL_EVENTS_LIMIT: i64 = 50;

/// Errors reported by the lifecycle service.
///
/// Only persistence outcomes appear here. Notification delivery is
/// best-effort and can never fail an operation.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// A task together with its recent event log, newest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithEvents {
    #[serde(flatten)]
    pub task: Task,
    pub events: Vec<TaskEvent>,
}

/// Owns task status transitions and event-log writes.
///
/// Every mutation is recorded durably before any notification is attempted;
/// a storage failure aborts the operation with no frame sent, while dispatch
/// problems (no subscribers, dead sockets) stay invisible to callers.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    dispatcher: Arc<dyn Dispatch>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self { store, dispatcher }
    }

    /// Create a new pending task.
    pub async fn create(&self, input: &CreateTask) -> Result<Task, TaskError> {
        let task = self.store.create_task(input).await?;
        tracing::info!(task_id = %task.id, name = %task.name, "Task created");
        Ok(task)
    }

    /// List tasks newest-first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Task>, TaskError> {
        Ok(self.store.list_tasks(limit, offset).await?)
    }

    /// Fetch a task with its recent events, or `None` when unknown.
    pub async fn get(&self, id: TaskId) -> Result<Option<TaskWithEvents>, TaskError> {
        let Some(task) = self.store.get_task(id).await? else {
            return Ok(None);
        };
        let events = self.store.list_task_events(id, DETAIL_EVENTS_LIMIT).await?;
        Ok(Some(TaskWithEvents { task, events }))
    }

    /// Transition a task to `status`.
    ///
    /// Persists the new status (terminal statuses stamp `completed_at` once),
    /// then emits a `task-status-update` frame and appends a derived event
    /// to the log, which emits its own `task-event` frame.
    pub async fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, TaskError> {
        let task = self
            .store
            .update_task_status(id, status)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        tracing::info!(task_id = %id, status = %status, "Task status updated");
        self.dispatcher.notify_status(id, status).await;

        self.log_event(
            id,
            status.derived_event_type(),
            &format!("Task status updated to {status}"),
            None,
        )
        .await?;

        Ok(task)
    }

    /// Append an immutable event to a task's log, then notify subscribers.
    pub async fn log_event(
        &self,
        task_id: TaskId,
        event_type: TaskEventType,
        message: &str,
        data: Option<serde_json::Value>,
    ) -> Result<TaskEvent, TaskError> {
        let event = self
            .store
            .append_task_event(task_id, event_type, message, data.as_ref())
            .await?;

        self.dispatcher
            .notify_event(
                task_id,
                EventPayload {
                    event_type,
                    message: message.to_string(),
                    data,
                    timestamp: event.created_at,
                },
            )
            .await;

        Ok(event)
    }

    /// Relay a fine-grained progress signal to subscribers. Nothing is
    /// persisted; clients that miss it re-fetch task state over HTTP.
    pub async fn record_activity(&self, task_id: TaskId, activity: serde_json::Value) {
        self.dispatcher.notify_activity(task_id, activity).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use abrowser_core::types::DbId;
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;

    // -----------------------------------------------------------------------
    // In-memory store with the same timestamp semantics as the SQL layer
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct MemStore {
        tasks: Mutex<HashMap<TaskId, Task>>,
        events: Mutex<Vec<TaskEvent>>,
        next_event_id: Mutex<DbId>,
    }

    impl MemStore {
        fn with_task(status: TaskStatus) -> (Self, TaskId) {
            let store = Self::default();
            let id = Uuid::new_v4();
            let now = chrono::Utc::now();
            store.tasks.lock().unwrap().insert(
                id,
                Task {
                    id,
                    name: "example".to_string(),
                    description: String::new(),
                    url: "https://example.com".to_string(),
                    status,
                    result: None,
                    created_at: now,
                    updated_at: now,
                    completed_at: None,
                },
            );
            (store, id)
        }
    }

    #[async_trait]
    impl TaskStore for MemStore {
        async fn create_task(&self, input: &CreateTask) -> Result<Task, sqlx::Error> {
            let now = chrono::Utc::now();
            let task = Task {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                description: input.description.clone(),
                url: input.url.clone(),
                status: TaskStatus::Pending,
                result: None,
                created_at: now,
                updated_at: now,
                completed_at: None,
            };
            self.tasks.lock().unwrap().insert(task.id, task.clone());
            Ok(task)
        }

        async fn get_task(&self, id: TaskId) -> Result<Option<Task>, sqlx::Error> {
            Ok(self.tasks.lock().unwrap().get(&id).cloned())
        }

        async fn list_tasks(&self, limit: i64, _offset: i64) -> Result<Vec<Task>, sqlx::Error> {
            let mut tasks: Vec<Task> = self.tasks.lock().unwrap().values().cloned().collect();
            tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            tasks.truncate(limit as usize);
            Ok(tasks)
        }

        async fn update_task_status(
            &self,
            id: TaskId,
            status: TaskStatus,
        ) -> Result<Option<Task>, sqlx::Error> {
            let mut tasks = self.tasks.lock().unwrap();
            let Some(task) = tasks.get_mut(&id) else {
                return Ok(None);
            };
            task.status = status;
            task.updated_at = chrono::Utc::now();
            if status.is_terminal() && task.completed_at.is_none() {
                task.completed_at = Some(task.updated_at);
            }
            Ok(Some(task.clone()))
        }

        async fn append_task_event(
            &self,
            task_id: TaskId,
            event_type: TaskEventType,
            message: &str,
            data: Option<&serde_json::Value>,
        ) -> Result<TaskEvent, sqlx::Error> {
            if !self.tasks.lock().unwrap().contains_key(&task_id) {
                return Err(sqlx::Error::RowNotFound);
            }
            let mut next_id = self.next_event_id.lock().unwrap();
            *next_id += 1;
            let event = TaskEvent {
                id: *next_id,
                task_id,
                event_type,
                message: message.to_string(),
                data: data.cloned(),
                created_at: chrono::Utc::now(),
            };
            self.events.lock().unwrap().push(event.clone());
            Ok(event)
        }

        async fn list_task_events(
            &self,
            task_id: TaskId,
            limit: i64,
        ) -> Result<Vec<TaskEvent>, sqlx::Error> {
            let mut events: Vec<TaskEvent> = self
                .events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.task_id == task_id)
                .cloned()
                .collect();
            events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            events.truncate(limit as usize);
            Ok(events)
        }
    }

    // -----------------------------------------------------------------------
    // Dispatcher that records every delivery attempt
    // -----------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Delivered {
        Status(TaskId, TaskStatus),
        Event(TaskId, TaskEventType, String),
        Activity(TaskId, serde_json::Value),
        Broadcast(String),
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        deliveries: Mutex<Vec<Delivered>>,
    }

    impl RecordingDispatcher {
        fn deliveries(&self) -> Vec<Delivered> {
            self.deliveries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Dispatch for RecordingDispatcher {
        async fn notify_status(&self, task_id: TaskId, status: TaskStatus) {
            self.deliveries
                .lock()
                .unwrap()
                .push(Delivered::Status(task_id, status));
        }

        async fn notify_event(&self, task_id: TaskId, event: EventPayload) {
            self.deliveries.lock().unwrap().push(Delivered::Event(
                task_id,
                event.event_type,
                event.message,
            ));
        }

        async fn notify_activity(&self, task_id: TaskId, activity: serde_json::Value) {
            self.deliveries
                .lock()
                .unwrap()
                .push(Delivered::Activity(task_id, activity));
        }

        async fn broadcast_all(&self, event: &str, _data: serde_json::Value) {
            self.deliveries
                .lock()
                .unwrap()
                .push(Delivered::Broadcast(event.to_string()));
        }
    }

    fn service_with(status: TaskStatus) -> (TaskService, TaskId, Arc<RecordingDispatcher>) {
        let (store, id) = MemStore::with_task(status);
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let service = TaskService::new(Arc::new(store), dispatcher.clone());
        (service, id, dispatcher)
    }

    #[tokio::test]
    async fn update_status_persists_then_notifies_in_order() {
        let (service, id, dispatcher) = service_with(TaskStatus::Pending);

        let task = service.update_status(id, TaskStatus::Running).await.unwrap();
        assert_eq!(task.status, TaskStatus::Running);

        let deliveries = dispatcher.deliveries();
        assert_eq!(deliveries.len(), 2);
        assert!(matches!(
            deliveries[0],
            Delivered::Status(task_id, TaskStatus::Running) if task_id == id
        ));
        assert!(matches!(
            &deliveries[1],
            Delivered::Event(task_id, TaskEventType::TaskStarted, message)
                if *task_id == id && message == "Task status updated to running"
        ));
    }

    #[tokio::test]
    async fn update_status_appends_exactly_one_derived_event() {
        let (service, id, _dispatcher) = service_with(TaskStatus::Running);

        service
            .update_status(id, TaskStatus::Completed)
            .await
            .unwrap();

        let detail = service.get(id).await.unwrap().unwrap();
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].event_type, TaskEventType::TaskCompleted);
    }

    #[tokio::test]
    async fn update_status_unknown_task_fails_without_dispatch() {
        let (service, _id, dispatcher) = service_with(TaskStatus::Pending);

        let result = service
            .update_status(Uuid::new_v4(), TaskStatus::Running)
            .await;

        assert!(matches!(result, Err(TaskError::NotFound(_))));
        assert!(dispatcher.deliveries().is_empty());
    }

    #[tokio::test]
    async fn terminal_completion_timestamp_is_written_once() {
        let (service, id, _dispatcher) = service_with(TaskStatus::Running);

        let completed = service
            .update_status(id, TaskStatus::Completed)
            .await
            .unwrap();
        let first = completed.completed_at.expect("terminal status stamps completed_at");

        // A later transition into another terminal status must not move it.
        let failed = service.update_status(id, TaskStatus::Failed).await.unwrap();
        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.completed_at, Some(first));
    }

    #[tokio::test]
    async fn non_terminal_status_leaves_completed_at_empty() {
        let (service, id, _dispatcher) = service_with(TaskStatus::Pending);

        let task = service.update_status(id, TaskStatus::Running).await.unwrap();
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn log_event_persists_row_and_notifies_with_payload() {
        let (service, id, dispatcher) = service_with(TaskStatus::Running);
        let data = serde_json::json!({ "selector": "#submit" });

        let event = service
            .log_event(id, TaskEventType::ActionExecuted, "Clicked submit", Some(data.clone()))
            .await
            .unwrap();

        assert_eq!(event.task_id, id);
        assert_eq!(event.data, Some(data));

        let deliveries = dispatcher.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert!(matches!(
            &deliveries[0],
            Delivered::Event(task_id, TaskEventType::ActionExecuted, message)
                if *task_id == id && message == "Clicked submit"
        ));
    }

    #[tokio::test]
    async fn log_event_storage_failure_sends_nothing() {
        let (service, _id, dispatcher) = service_with(TaskStatus::Running);

        let result = service
            .log_event(Uuid::new_v4(), TaskEventType::ErrorOccurred, "boom", None)
            .await;

        assert!(matches!(result, Err(TaskError::Storage(_))));
        assert!(dispatcher.deliveries().is_empty());
    }

    #[tokio::test]
    async fn record_activity_dispatches_without_persisting() {
        let (service, id, dispatcher) = service_with(TaskStatus::Running);

        service
            .record_activity(id, serde_json::json!({ "action": "scroll" }))
            .await;

        let deliveries = dispatcher.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert!(matches!(&deliveries[0], Delivered::Activity(task_id, _) if *task_id == id));

        // The event log stays empty.
        let detail = service.get(id).await.unwrap().unwrap();
        assert!(detail.events.is_empty());
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let (store, _existing) = MemStore::with_task(TaskStatus::Running);
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let service = TaskService::new(Arc::new(store), dispatcher.clone());

        let task = service
            .create(&CreateTask {
                name: "scrape listings".to_string(),
                description: String::new(),
                url: "https://example.com/listings".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        // Creation is not a status transition; nothing is dispatched.
        assert!(dispatcher.deliveries().is_empty());
    }
}
