use actix_web::{get, put, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    auth::AdminUser,
    error::AppError,
    models::{Role, UserSummary},
    store::Store,
    AppState,
};

/// Body for the role update endpoint. An unknown role label fails at
/// deserialization and answers 400 before the handler runs.
#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// Admin-only: lists all users as summaries (never the password hash).
#[get("/users")]
pub async fn get_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let users = state.store.list_users().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// Admin-only: changes a user's role.
///
/// The new role takes effect on the target's very next request, because the
/// role guard re-reads the record instead of trusting anything in the token.
///
/// ## Responses:
/// - `200 OK`: updated user summary.
/// - `400 Bad Request`: role not one of `user`/`admin`.
/// - `403 Forbidden`: caller is not an admin.
/// - `404 Not Found`: no user with that id.
#[put("/users/{id}/role")]
pub async fn update_user_role(
    state: web::Data<AppState>,
    user_id: web::Path<i64>,
    update: web::Json<RoleUpdate>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let updated = state
        .store
        .set_user_role(user_id.into_inner(), update.role)
        .await?;

    match updated {
        Some(user) => Ok(HttpResponse::Ok().json(UserSummary::from(&user))),
        None => Err(AppError::NotFound("User not found".into())),
    }
}
