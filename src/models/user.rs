use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Coarse authorization level attached to a user.
/// Corresponds to the `user_role` SQL enum.
///
/// The role is never embedded in bearer tokens; admin checks re-read it from
/// the store so that promotions and demotions apply immediately.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, may only touch its own resources.
    User,
    /// May list users and change roles.
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A user identity record as held in the store.
///
/// The password hash never leaves the server; it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced view of a user returned by the admin endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}
