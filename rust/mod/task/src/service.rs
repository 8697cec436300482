use std::sync::Arc;

use tracing::info;

use taskboard_core::{new_id, now_rfc3339, ServiceError};

use crate::model::{NewTask, Task, TaskPatch};
use crate::store::TaskStore;

/// Business logic for tasks: identifier and timestamp assignment, and
/// boundary-side merge semantics for partial updates.
///
/// Existence failures are boolean outcomes, not errors — the API layer
/// decides what "not found" looks like on the wire.
pub struct TaskService {
    store: Arc<TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }

    /// List all live tasks.
    pub fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.store.list_active()
    }

    /// Get a live task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, ServiceError> {
        self.store.get(id)
    }

    /// Create a new task from validated fields.
    ///
    /// Assigns the identifier and sets both timestamps to the same instant.
    pub fn create_task(&self, input: NewTask) -> Result<Task, ServiceError> {
        let now = now_rfc3339();
        let task = Task {
            id: new_id(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.create(&task)?;
        info!(id = %task.id, "created task");
        Ok(task)
    }

    /// Merge a validated patch onto the existing task and persist.
    ///
    /// Fields absent from the patch keep their stored value; the repository
    /// then replaces the whole document. Returns `false` when no live task
    /// matches `id`.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<bool, ServiceError> {
        let Some(mut task) = self.store.get(id)? else {
            return Ok(false);
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now_rfc3339();

        self.store.update(id, &task)?;
        info!(id, "updated task");
        Ok(true)
    }

    /// Soft-delete a task. Returns `false` when the id is unknown or the
    /// task was already deleted.
    pub fn delete_task(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.store.soft_delete(id)?;
        if deleted {
            info!(id, "soft-deleted task");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};
    use taskboard_sql::SqliteStore;

    fn test_service() -> TaskService {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        let store = Arc::new(TaskStore::new(db).unwrap());
        TaskService::new(store)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: "2025-01-10".into(),
        }
    }

    #[test]
    fn create_assigns_id_and_equal_timestamps() {
        let svc = test_service();
        let task = svc.create_task(new_task("Write spec")).unwrap();

        assert_eq!(task.id.len(), 32);
        assert_eq!(task.created_at, task.updated_at);

        let fetched = svc.get_task(&task.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Write spec");
    }

    #[test]
    fn update_merges_present_fields_only() {
        let svc = test_service();
        let task = svc.create_task(new_task("Write spec")).unwrap();

        let ok = svc
            .update_task(
                &task.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(ok);

        let got = svc.get_task(&task.id).unwrap().unwrap();
        assert_eq!(got.status, TaskStatus::Done);
        // Fields absent from the patch keep their stored value.
        assert_eq!(got.title, "Write spec");
        assert_eq!(got.priority, TaskPriority::Medium);
        assert_eq!(got.due_date, "2025-01-10");
    }

    #[test]
    fn update_advances_updated_at() {
        let svc = test_service();
        let task = svc.create_task(new_task("Write spec")).unwrap();

        svc.update_task(
            &task.id,
            TaskPatch {
                title: Some("Rewrite spec".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let got = svc.get_task(&task.id).unwrap().unwrap();
        assert_eq!(got.created_at, task.created_at);
        assert!(got.updated_at > task.updated_at);
        assert!(got.updated_at >= got.created_at);
    }

    #[test]
    fn update_unknown_id_reports_false() {
        let svc = test_service();
        let ok = svc.update_task("ghost", TaskPatch::default()).unwrap();
        assert!(!ok);
    }

    #[test]
    fn delete_then_everything_sees_nothing() {
        let svc = test_service();
        let task = svc.create_task(new_task("doomed")).unwrap();

        assert!(svc.delete_task(&task.id).unwrap());
        assert!(svc.get_task(&task.id).unwrap().is_none());
        assert!(svc.list_tasks().unwrap().is_empty());
        assert!(!svc.update_task(&task.id, TaskPatch::default()).unwrap());
        assert!(!svc.delete_task(&task.id).unwrap());
    }
}
