use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::Role,
    store::Store,
    AppState,
};

/// Register a new user
///
/// Creates a new user account. No token is returned; a separate login is
/// required. A client-supplied `admin` role is refused — promotion only
/// happens through the admin endpoint.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    if register_data.role == Some(Role::Admin) {
        return Err(AppError::BadRequest(
            "cannot self-assign the admin role".into(),
        ));
    }

    // Hash password
    let password_hash = hash_password(&register_data.password, state.bcrypt_cost)?;

    // No existence pre-check: the store's uniqueness constraint decides a
    // race between two registrations, and the loser maps to 409.
    state
        .store
        .create_user(
            &register_data.username,
            &password_hash,
            register_data.role.unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// Authenticates a user and returns a bearer token. An unknown username and
/// a wrong password produce the identical response, so a caller cannot probe
/// which usernames exist.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = state.store.user_by_username(&login_data.username).await?;

    match user {
        Some(user) => {
            // Verify password
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = state.tokens.issue(user.id)?;
                Ok(HttpResponse::Ok().json(AuthResponse { token }))
            } else {
                Err(AppError::Unauthorized("Invalid username or password".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid username or password".into())),
    }
}
