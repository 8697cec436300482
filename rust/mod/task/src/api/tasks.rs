use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::routing::get;
use axum::{Json, Router};

use taskboard_core::ServiceError;

use crate::model::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::service::TaskService;

type ServiceState = Arc<TaskService>;

pub fn router(service: Arc<TaskService>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(service)
}

fn not_found() -> ServiceError {
    // Deliberately detail-free: a malformed id and an unknown id are
    // indistinguishable to the caller.
    ServiceError::NotFound("task not found".into())
}

// ---------------------------------------------------------------------------
// GET /tasks
// ---------------------------------------------------------------------------

async fn list_tasks(
    State(service): State<ServiceState>,
) -> Result<Json<Vec<TaskResponse>>, ServiceError> {
    let tasks = service.list_tasks()?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /tasks/:id
// ---------------------------------------------------------------------------

async fn get_task(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ServiceError> {
    match service.get_task(&id)? {
        Some(task) => Ok(Json(task.into())),
        None => Err(not_found()),
    }
}

// ---------------------------------------------------------------------------
// POST /tasks
// ---------------------------------------------------------------------------

async fn create_task(
    State(service): State<ServiceState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<TaskResponse>), ServiceError> {
    // Validation happens before any backend call; nothing is persisted on
    // failure.
    let input = req.validate()?;
    let task = service.create_task(input)?;
    let location = format!("/task/tasks/{}", task.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(task.into()),
    ))
}

// ---------------------------------------------------------------------------
// PUT /tasks/:id
// ---------------------------------------------------------------------------

async fn update_task(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<StatusCode, ServiceError> {
    let patch = req.validate()?;
    if service.update_task(&id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

// ---------------------------------------------------------------------------
// DELETE /tasks/:id
// ---------------------------------------------------------------------------

async fn delete_task(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    if service.delete_task(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
