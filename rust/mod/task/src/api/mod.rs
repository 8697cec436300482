mod tasks;

use std::sync::Arc;

use axum::Router;

use crate::service::TaskService;

/// Build the complete task module router.
///
/// Routes:
/// - `GET    /tasks`      — list live tasks
/// - `POST   /tasks`      — create task
/// - `GET    /tasks/:id`  — get task
/// - `PUT    /tasks/:id`  — partial update
/// - `DELETE /tasks/:id`  — soft delete
pub fn router(service: Arc<TaskService>) -> Router {
    tasks::router(service)
}
