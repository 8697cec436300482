pub mod api;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use taskboard_core::Module;
use taskboard_sql::SQLStore;

use service::TaskService;
use store::TaskStore;

/// The Task module — CRUD with soft deletion over a document-style store.
///
/// Constructed explicitly with its storage backend; the binary entry point
/// nests its routes under `/task`.
pub struct TaskModule {
    service: Arc<TaskService>,
}

impl TaskModule {
    /// Create the task module and initialise storage.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, taskboard_core::ServiceError> {
        let store = Arc::new(TaskStore::new(db)?);
        let service = Arc::new(TaskService::new(store));
        Ok(Self { service })
    }

    /// Get a reference to the TaskService for programmatic use.
    pub fn service(&self) -> &Arc<TaskService> {
        &self.service
    }
}

impl Module for TaskModule {
    fn name(&self) -> &str {
        "task"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
