use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::{Role, User};
use crate::store::Store;
use crate::AppState;

/// The verified identity of the caller, as bound by `AuthMiddleware`.
///
/// This is the typed replacement for an untyped context lookup: handlers
/// declare it as a parameter and the identity is threaded through the
/// request's extensions. If it is missing the middleware did not run, and
/// the safe answer is 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError converts via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().copied() {
            Some(identity) => ready(Ok(identity)),
            None => {
                let err = AppError::Unauthorized(
                    "User identity not found in request. Ensure AuthMiddleware is active."
                        .to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

/// Role guard for admin-only routes.
///
/// Loads the caller's user record fresh from the store on every extraction;
/// the role is authoritative live, never taken from the token. A missing
/// record or a non-admin role both end the request with 403 before the
/// handler body runs.
#[derive(Debug)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<CurrentUser>().copied();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let identity = identity.ok_or_else(|| {
                AppError::Unauthorized("User identity not found in request".to_string())
            })?;
            let state = state
                .ok_or_else(|| AppError::Internal("application state not configured".into()))?;

            let user = state
                .store
                .user_by_id(identity.id)
                .await
                .map_err(AppError::from)?;

            match user {
                Some(user) if user.role == Role::Admin => Ok(AdminUser(user)),
                _ => Err(AppError::Forbidden("Admin access only".into()).into()),
            }
        })
    }
}
