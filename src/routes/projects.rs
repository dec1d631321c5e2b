use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{ProjectInput, TaskFilter, TaskQuery},
    store::Store,
    AppState,
};

/// Lists the caller's projects.
#[get("")]
pub async fn get_projects(
    state: web::Data<AppState>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let projects = state.store.list_projects(identity.id).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project owned by the caller.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    project_data: web::Json<ProjectInput>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = state
        .store
        .create_project(identity.id, &project_data.name)
        .await?;

    Ok(HttpResponse::Created().json(project))
}

/// Lists the tasks inside one of the caller's projects.
///
/// The project is looked up scoped to the caller first, so another user's
/// project id answers 404 rather than leaking its existence.
#[get("/{id}/tasks")]
pub async fn get_project_tasks(
    state: web::Data<AppState>,
    project_id: web::Path<i64>,
    query_params: web::Query<TaskQuery>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();

    let project = state.store.project_by_id(identity.id, project_id).await?;
    if project.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }

    let mut filter = TaskFilter::from(query_params.into_inner());
    filter.project_id = Some(project_id);

    let tasks = state.store.list_tasks(identity.id, &filter).await?;
    Ok(HttpResponse::Ok().json(tasks))
}
