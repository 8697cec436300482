use std::sync::Arc;

use taskboard_core::ServiceError;
use taskboard_sql::{Row, SQLStore, Value};

use crate::model::Task;

/// Schema for the tasks table.
///
/// The full record is a JSON document in `data`; filterable fields are
/// mirrored into indexed columns. The soft-delete flag lives only in its
/// column, so deleting is a single field-level update.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tasks (
        id          TEXT PRIMARY KEY,
        data        TEXT NOT NULL,
        status      TEXT NOT NULL,
        due_date    TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        is_deleted  INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_is_deleted ON tasks(is_deleted)",
];

/// Persistent storage for tasks, backed by SQLStore (SQLite).
///
/// Every query here carries the `is_deleted = 0` filter — a soft-deleted
/// task is invisible to all callers of this layer. Centralizing the filter
/// keeps the invariant in one place instead of at every call site.
pub struct TaskStore {
    db: Arc<dyn SQLStore>,
}

impl TaskStore {
    /// Create a new TaskStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        for stmt in SCHEMA {
            db.exec(stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("task schema init: {e}")))?;
        }
        Ok(Self { db })
    }

    /// List all tasks that have not been soft-deleted.
    pub fn list_active(&self) -> Result<Vec<Task>, ServiceError> {
        let rows = self
            .db
            .query("SELECT data FROM tasks WHERE is_deleted = 0", &[])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        rows.iter().map(row_to_task).collect()
    }

    /// Get a live task by ID. Absence (unknown id or deleted) is `None`,
    /// not an error.
    pub fn get(&self, id: &str) -> Result<Option<Task>, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT data FROM tasks WHERE id = ?1 AND is_deleted = 0",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        rows.first().map(row_to_task).transpose()
    }

    /// Insert a new task.
    pub fn create(&self, task: &Task) -> Result<(), ServiceError> {
        let data =
            serde_json::to_string(task).map_err(|e| ServiceError::Internal(e.to_string()))?;

        self.db
            .exec(
                "INSERT INTO tasks (id, data, status, due_date, created_at, is_deleted) \
                 VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                &[
                    Value::Text(task.id.clone()),
                    Value::Text(data),
                    Value::Text(task.status.as_str().to_string()),
                    Value::Text(task.due_date.clone()),
                    Value::Text(task.created_at.clone()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Replace the document of the live task matching `id`.
    ///
    /// A no-op when no live record matches — callers pre-check existence.
    pub fn update(&self, id: &str, task: &Task) -> Result<(), ServiceError> {
        let data =
            serde_json::to_string(task).map_err(|e| ServiceError::Internal(e.to_string()))?;

        self.db
            .exec(
                "UPDATE tasks SET data = ?1, status = ?2, due_date = ?3 \
                 WHERE id = ?4 AND is_deleted = 0",
                &[
                    Value::Text(data),
                    Value::Text(task.status.as_str().to_string()),
                    Value::Text(task.due_date.clone()),
                    Value::Text(id.to_string()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Soft-delete the task matching `id`, if not already deleted.
    ///
    /// Returns whether exactly one record was modified. `false` means the
    /// id is unknown or the record was already deleted — the flag is never
    /// re-flipped.
    pub fn soft_delete(&self, id: &str) -> Result<bool, ServiceError> {
        let affected = self
            .db
            .exec(
                "UPDATE tasks SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(affected > 0)
    }
}

/// Deserialize a Task from a row's `data` JSON column.
fn row_to_task(row: &Row) -> Result<Task, ServiceError> {
    let json = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Storage("missing data column".into()))?;
    serde_json::from_str(json).map_err(|e| ServiceError::Storage(format!("bad task json: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};
    use taskboard_sql::SqliteStore;

    fn test_store() -> TaskStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        TaskStore::new(db).unwrap()
    }

    fn make_task(id: &str, title: &str) -> Task {
        let now = taskboard_core::now_rfc3339();
        Task {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: "2025-01-10".into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn create_and_get() {
        let store = test_store();
        store.create(&make_task("t1", "Write spec")).unwrap();

        let got = store.get("t1").unwrap().unwrap();
        assert_eq!(got.id, "t1");
        assert_eq!(got.title, "Write spec");
        assert_eq!(got.status, TaskStatus::Todo);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = test_store();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn list_excludes_deleted() {
        let store = test_store();
        store.create(&make_task("a", "one")).unwrap();
        store.create(&make_task("b", "two")).unwrap();

        assert!(store.soft_delete("a").unwrap());

        let items = store.list_active().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "b");
    }

    #[test]
    fn deleted_task_is_invisible() {
        let store = test_store();
        store.create(&make_task("t1", "doomed")).unwrap();

        assert!(store.soft_delete("t1").unwrap());
        assert!(store.get("t1").unwrap().is_none());

        // Update against a deleted record is a silent no-op.
        let replacement = make_task("t1", "resurrected");
        store.update("t1", &replacement).unwrap();
        assert!(store.get("t1").unwrap().is_none());
    }

    #[test]
    fn soft_delete_second_time_reports_false() {
        let store = test_store();
        store.create(&make_task("t1", "once")).unwrap();

        assert!(store.soft_delete("t1").unwrap());
        assert!(!store.soft_delete("t1").unwrap());
        assert!(!store.soft_delete("never-existed").unwrap());
    }

    #[test]
    fn update_replaces_document() {
        let store = test_store();
        store.create(&make_task("t1", "before")).unwrap();

        let mut task = store.get("t1").unwrap().unwrap();
        task.title = "after".into();
        task.status = TaskStatus::Done;
        store.update("t1", &task).unwrap();

        let got = store.get("t1").unwrap().unwrap();
        assert_eq!(got.title, "after");
        assert_eq!(got.status, TaskStatus::Done);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let store = test_store();
        let task = make_task("ghost", "nothing");
        store.update("ghost", &task).unwrap();
        assert!(store.get("ghost").unwrap().is_none());
        assert!(store.list_active().unwrap().is_empty());
    }
}
