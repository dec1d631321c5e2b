use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A label a user can attach to tasks. Scoped to its owner like every other
/// resource.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

/// Input payload for creating a tag.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}
