use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Project, Role, Tag, Task, TaskFilter, TaskInput, User};
use crate::store::{Store, StoreError};

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, project_id, user_id, created_at, updated_at";

/// Postgres-backed store. Username uniqueness rides on the unique index in
/// the `users` table; the losing side of a racing registration surfaces as
/// `StoreError::Conflict`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return StoreError::Conflict("username already exists".into());
            }
        }
        StoreError::Backend(error.to_string())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn set_user_role(&self, id: i64, role: Role) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE users SET role = $1, updated_at = now() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_task(&self, user_id: i64, input: TaskInput) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, project_id, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.status)
            .bind(input.project_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        // Base query scoped to the owner; filter conditions are appended
        // dynamically. Sort column and direction come from closed enums, so
        // interpolating them is safe.
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1");
        let mut param_count = 2;

        if filter.project_id.is_some() {
            sql.push_str(&format!(" AND project_id = ${}", param_count));
            param_count += 1;
        }
        if filter.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }

        sql.push_str(&format!(
            " ORDER BY {} {} LIMIT ${} OFFSET ${}",
            filter.sort.column(),
            filter.order.keyword(),
            param_count,
            param_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(user_id);

        if let Some(project_id) = filter.project_id {
            query_builder = query_builder.bind(project_id);
        }
        if let Some(status) = filter.status {
            query_builder = query_builder.bind(status);
        }
        query_builder = query_builder.bind(filter.limit).bind(filter.offset);

        let tasks = query_builder.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn task_by_id(&self, user_id: i64, id: i64) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: i64,
        id: i64,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, description = $2, status = $3, project_id = $4, \
             updated_at = now() WHERE id = $5 AND user_id = $6 RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.status)
            .bind(input.project_id)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, user_id: i64, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_project(&self, user_id: i64, name: &str) -> Result<Project, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name, user_id) VALUES ($1, $2) \
             RETURNING id, name, user_id, created_at",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, user_id, created_at FROM projects WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn project_by_id(&self, user_id: i64, id: i64) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, user_id, created_at FROM projects WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn create_tag(&self, user_id: i64, name: &str) -> Result<Tag, StoreError> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, user_id) VALUES ($1, $2) RETURNING id, name, user_id",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(tag)
    }

    async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>, StoreError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, user_id FROM tags WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }
}
