pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

// Re-export necessary items
pub use extractors::{AdminUser, CurrentUser};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenManager};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Payload for a new user registration request.
///
/// `role` is accepted for wire compatibility but a client asking for `admin`
/// is rejected outright; promotion goes through the guarded admin endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username. Must be between 3 and 32 characters, alphanumeric,
    /// and may include underscores or hyphens. Matching is case-sensitive.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Password for the new account. Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
    /// Optional requested role; anything but `user` is refused.
    pub role: Option<Role>,
}

/// Payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed bearer token for subsequent requests.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            username: "test_user-123".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        assert!(valid_register.validate().is_ok());

        let invalid_username_register = RegisterRequest {
            username: "test user!".to_string(), // Contains space and exclamation
            password: "password123".to_string(),
            role: None,
        };
        assert!(invalid_username_register.validate().is_err());

        let short_username_register = RegisterRequest {
            username: "tu".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        assert!(short_username_register.validate().is_err());

        let short_password_register = RegisterRequest {
            username: "testuser".to_string(),
            password: "123".to_string(),
            role: None,
        };
        assert!(short_password_register.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            username: "testuser".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let empty_username_login = LoginRequest {
            username: "".to_string(),
            password: "password123".to_string(),
        };
        assert!(empty_username_login.validate().is_err());

        let empty_password_login = LoginRequest {
            username: "testuser".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password_login.validate().is_err());
    }

    #[test]
    fn test_register_role_parsing() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "sumit", "password": "secret1"}"#).unwrap();
        assert!(req.role.is_none());

        let req: RegisterRequest = serde_json::from_str(
            r#"{"username": "sumit", "password": "secret1", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Some(Role::Admin));

        // Unknown role labels fail at deserialization.
        assert!(serde_json::from_str::<RegisterRequest>(
            r#"{"username": "sumit", "password": "secret1", "role": "root"}"#
        )
        .is_err());
    }
}
