//!
//! # Record store abstraction
//!
//! Persistence is kept behind the [`Store`] trait so the HTTP layer never
//! depends on a concrete backend. The binary wires up [`PgStore`]; the test
//! suite runs against [`MemoryStore`].
//!
//! Every task/project/tag operation takes the owning `user_id` and scopes by
//! it, so a record belonging to another user is indistinguishable from one
//! that does not exist.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::models::{Project, Role, Tag, Task, TaskFilter, TaskInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors produced by a store backend.
#[derive(Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. duplicate username).
    Conflict(String),
    /// Any other backend failure. The message is for the server log only.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Generic record store behind all persistence.
///
/// Concurrent registrations with the same username are resolved by the
/// backend's own uniqueness enforcement; `create_user` must surface the
/// losing write as [`StoreError::Conflict`].
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError>;

    /// Case-sensitive exact match on username.
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Updates the role of the given user, returning the updated record, or
    /// `None` when no such user exists.
    async fn set_user_role(&self, id: i64, role: Role) -> Result<Option<User>, StoreError>;

    // --- tasks ---

    async fn create_task(&self, user_id: i64, input: TaskInput) -> Result<Task, StoreError>;

    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn task_by_id(&self, user_id: i64, id: i64) -> Result<Option<Task>, StoreError>;

    /// Full replacement of the mutable task fields. Returns `None` when the
    /// task does not exist or is owned by someone else.
    async fn update_task(
        &self,
        user_id: i64,
        id: i64,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete_task(&self, user_id: i64, id: i64) -> Result<bool, StoreError>;

    // --- projects ---

    async fn create_project(&self, user_id: i64, name: &str) -> Result<Project, StoreError>;

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, StoreError>;

    async fn project_by_id(&self, user_id: i64, id: i64) -> Result<Option<Project>, StoreError>;

    // --- tags ---

    async fn create_tag(&self, user_id: i64, name: &str) -> Result<Tag, StoreError>;

    async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>, StoreError>;
}
