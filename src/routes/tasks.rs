use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskFilter, TaskInput, TaskQuery},
    store::Store,
    AppState,
};

/// Retrieves the tasks owned by the authenticated user.
///
/// ## Query Parameters:
/// - `project_id` (optional): only tasks in the given project.
/// - `status` (optional): only tasks with the given status.
/// - `sort` (optional): `created_at` (default), `updated_at`, `title`, or
///   `status`; anything else falls back to the default.
/// - `order` (optional): `asc` or `desc` (default).
/// - `limit` (optional): page size, default 10, capped at 100.
/// - `offset` (optional): number of results to skip.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let filter = TaskFilter::from(query_params.into_inner());
    let tasks = state.store.list_tasks(identity.id, &filter).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// The owner is always the caller; a `user_id` in the body is not accepted.
///
/// ## Responses:
/// - `201 Created`: the new `Task` as JSON.
/// - `400 Bad Request`: malformed body or failed validation.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .store
        .create_task(identity.id, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task by id.
///
/// A task owned by another user is reported as absent, not forbidden, so
/// ids cannot be probed for existence.
///
/// ## Responses:
/// - `200 OK`: the `Task` as JSON.
/// - `404 Not Found`: no such task for this caller.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<i64>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = state
        .store
        .task_by_id(identity.id, task_id.into_inner())
        .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Replaces the mutable fields of a task the caller owns.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` as JSON.
/// - `400 Bad Request`: malformed body or failed validation.
/// - `404 Not Found`: no such task for this caller.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let updated = state
        .store
        .update_task(identity.id, task_id.into_inner(), task_data.into_inner())
        .await?;

    match updated {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such task for this caller.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<i64>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .store
        .delete_task(identity.id, task_id.into_inner())
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
