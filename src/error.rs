//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure modes the API can produce, from malformed requests to
//! store failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses with JSON bodies. `From` trait
//! implementations for `store::StoreError`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError` allow conversion with the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
///
/// Each variant carries a message detailing the issue and maps to a fixed
/// HTTP status code in the `ResponseError` implementation.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or invalid request input (HTTP 400).
    BadRequest(String),
    /// Missing/invalid/expired token, or bad login credentials (HTTP 401).
    Unauthorized(String),
    /// Valid identity but insufficient role (HTTP 403).
    Forbidden(String),
    /// Resource absent, or not owned by the caller (HTTP 404).
    NotFound(String),
    /// Uniqueness violation, e.g. an already-taken username (HTTP 409).
    Conflict(String),
    /// Hashing/signing/store failure not attributable to caller input
    /// (HTTP 500). The message is logged server-side, never sent to the
    /// client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This lets Actix Web translate `AppError` results from handlers and
/// middleware into the correct HTTP status codes and JSON error bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            // Internal errors are presented as an opaque body; the detail
            // stays in the server log.
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "internal server error"
                }))
            }
        }
    }
}

/// Converts `StoreError` into `AppError`.
///
/// Uniqueness violations become `Conflict`; everything else is a backend
/// failure surfaced as `Internal`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// The detailed validation messages are preserved in the response body.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
///
/// Hashing failures (including malformed stored hashes) are never the
/// caller's fault.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Forbidden("Admin access only".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::NotFound("Resource not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Conflict("Username already exists".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::Internal("Server error".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AppError = StoreError::Conflict("username taken".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = StoreError::Backend("connection reset".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_bcrypt_error_conversion() {
        let bcrypt_err = bcrypt::verify("pw", "not-a-bcrypt-hash").unwrap_err();
        let err: AppError = bcrypt_err.into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_display_includes_detail() {
        let error = AppError::Conflict("username taken".into());
        assert_eq!(error.to_string(), "Conflict: username taken");
    }
}
