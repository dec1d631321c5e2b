use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::CurrentUser;
use crate::error::AppError;
use crate::AppState;

/// Identity middleware for protected scopes.
///
/// Wrap this around each scope that requires authentication; public routes
/// (register, login, health) are simply registered outside such scopes.
/// On success the resolved identity is inserted into request extensions as a
/// typed [`CurrentUser`] for downstream extractors; on any failure the
/// request is aborted with 401 and the inner service is never called.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Exact scheme match: "Bearer" is case-sensitive, exactly one space.
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty());

        let token = match token {
            Some(token) => token.to_string(),
            None => {
                let app_err =
                    AppError::Unauthorized("Authorization header missing or malformed".into());
                let res = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                return Box::pin(async move { Ok(res) });
            }
        };

        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.clone(),
            None => {
                let app_err = AppError::Internal("application state not configured".into());
                let res = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                return Box::pin(async move { Ok(res) });
            }
        };

        match state.tokens.verify(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(CurrentUser { id: claims.sub });
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(token_err) => {
                // Expired vs invalid is not distinguished to the client.
                let app_err = AppError::from(token_err);
                let res = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
