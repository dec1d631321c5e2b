use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{auth::CurrentUser, error::AppError, models::TagInput, store::Store, AppState};

/// Lists the caller's tags.
#[get("")]
pub async fn get_tags(
    state: web::Data<AppState>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tags = state.store.list_tags(identity.id).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// Creates a tag owned by the caller.
#[post("")]
pub async fn create_tag(
    state: web::Data<AppState>,
    tag_data: web::Json<TagInput>,
    identity: CurrentUser,
) -> Result<impl Responder, AppError> {
    tag_data.validate()?;

    let tag = state.store.create_tag(identity.id, &tag_data.name).await?;
    Ok(HttpResponse::Created().json(tag))
}
