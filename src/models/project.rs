use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project groups tasks for a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Input payload for creating a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Project name, 1 to 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}
