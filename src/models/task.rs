use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Input structure for creating or updating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description. Maximum 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// The status of the task. Defaults to `todo` when omitted.
    #[serde(default)]
    pub status: TaskStatus,

    /// Optional project the task belongs to.
    pub project_id: Option<i64>,
}

/// A task entity as held in the store and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub project_id: Option<i64>,
    /// Identifier of the user who owns the task. Every query over tasks is
    /// scoped by this column.
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field a task listing may be ordered by.
///
/// Kept as a closed enum so the column name handed to the store is always
/// one of these, never a caller-supplied string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
}

impl SortField {
    /// Parses a query-string value, falling back to `created_at` for
    /// anything unrecognized.
    pub fn parse(value: &str) -> Self {
        match value {
            "updated_at" => SortField::UpdatedAt,
            "title" => SortField::Title,
            "status" => SortField::Status,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a query-string value, falling back to descending.
    pub fn parse(value: &str) -> Self {
        match value {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw query parameters accepted by `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub project_id: Option<i64>,
    pub status: Option<TaskStatus>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Normalized filter handed to the store after defaults and whitelisting
/// have been applied to a `TaskQuery`.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    pub project_id: Option<i64>,
    pub status: Option<TaskStatus>,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        Self {
            project_id: query.project_id,
            status: query.status,
            sort: query
                .sort
                .as_deref()
                .map(SortField::parse)
                .unwrap_or(SortField::CreatedAt),
            order: query
                .order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or(SortOrder::Desc),
            limit: query
                .limit
                .unwrap_or(DEFAULT_LIMIT)
                .clamp(1, MAX_LIMIT),
            offset: query.offset.unwrap_or(0).max(0),
        }
    }
}
