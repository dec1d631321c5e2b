use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Project, Role, SortField, SortOrder, Tag, Task, TaskFilter, TaskInput, User};
use crate::store::{Store, StoreError};

/// In-memory store backing the test suite.
///
/// Uniqueness and id assignment happen under a single write lock, which gives
/// the same linearizable per-row behavior the Postgres backend provides
/// through its constraints. No lock is held across an await point.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    tasks: Vec<Task>,
    projects: Vec<Project>,
    tags: Vec<Tag>,
    next_user_id: i64,
    next_task_id: i64,
    next_project_id: i64,
    next_tag_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::Backend("store lock poisoned".into())
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        // Check-and-insert under the write lock stands in for the unique
        // index; a racing duplicate registration loses here.
        if inner.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict("username already exists".into()));
        }

        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.users.clone())
    }

    async fn set_user_role(&self, id: i64, role: Role) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role;
                user.updated_at = Utc::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn create_task(&self, user_id: i64, input: TaskInput) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: inner.next_task_id,
            title: input.title,
            description: input.description,
            status: input.status,
            project_id: input.project_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;

        let mut tasks: Vec<Task> = inner
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.project_id.map_or(true, |p| t.project_id == Some(p)))
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();

        tasks.sort_by(|a, b| {
            let ord = compare(a, b, filter.sort);
            match filter.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        Ok(tasks
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn task_by_id(&self, user_id: i64, id: i64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .tasks
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn update_task(
        &self,
        user_id: i64,
        id: i64,
        input: TaskInput,
    ) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        match inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
        {
            Some(task) => {
                task.title = input.title;
                task.description = input.description;
                task.status = input.status;
                task.project_id = input.project_id;
                task.updated_at = Utc::now();
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_task(&self, user_id: i64, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(inner.tasks.len() < before)
    }

    async fn create_project(&self, user_id: i64, name: &str) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_project_id += 1;
        let project = Project {
            id: inner.next_project_id,
            name: name.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self, user_id: i64) -> Result<Vec<Project>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn project_by_id(&self, user_id: i64, id: i64) -> Result<Option<Project>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn create_tag(&self, user_id: i64, name: &str) -> Result<Tag, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_tag_id += 1;
        let tag = Tag {
            id: inner.next_tag_id,
            name: name.to_string(),
            user_id,
        };
        inner.tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .tags
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskQuery, TaskStatus};
    use pretty_assertions::assert_eq;

    fn filter(query: TaskQuery) -> TaskFilter {
        TaskFilter::from(query)
    }

    fn default_query() -> TaskQuery {
        TaskQuery {
            project_id: None,
            status: None,
            sort: None,
            order: None,
            limit: None,
            offset: None,
        }
    }

    fn task_input(title: &str, status: TaskStatus) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status,
            project_id: None,
        }
    }

    #[actix_rt::test]
    async fn test_duplicate_username_is_conflict() {
        let store = MemoryStore::new();
        store
            .create_user("sumit", "hash-a", Role::User)
            .await
            .unwrap();

        let err = store
            .create_user("sumit", "hash-b", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Username matching is case-sensitive; this is a different user.
        assert!(store.create_user("Sumit", "hash-c", Role::User).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_task_scoping_by_owner() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice", "h", Role::User).await.unwrap();
        let bob = store.create_user("bob", "h", Role::User).await.unwrap();

        let task = store
            .create_task(alice.id, task_input("Alice's task", TaskStatus::Todo))
            .await
            .unwrap();

        // Bob cannot see, update, or delete Alice's task.
        assert!(store.task_by_id(bob.id, task.id).await.unwrap().is_none());
        assert!(store
            .update_task(bob.id, task.id, task_input("stolen", TaskStatus::Done))
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_task(bob.id, task.id).await.unwrap());

        assert!(store.task_by_id(alice.id, task.id).await.unwrap().is_some());
    }

    #[actix_rt::test]
    async fn test_task_sorting_and_paging() {
        let store = MemoryStore::new();
        let user = store.create_user("sorter", "h", Role::User).await.unwrap();

        for title in ["banana", "apple", "cherry"] {
            store
                .create_task(user.id, task_input(title, TaskStatus::Todo))
                .await
                .unwrap();
        }

        let mut query = default_query();
        query.sort = Some("title".to_string());
        query.order = Some("asc".to_string());
        let tasks = store.list_tasks(user.id, &filter(query)).await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "banana", "cherry"]);

        let mut query = default_query();
        query.sort = Some("title".to_string());
        query.order = Some("asc".to_string());
        query.limit = Some(1);
        query.offset = Some(1);
        let tasks = store.list_tasks(user.id, &filter(query)).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "banana");
    }

    #[actix_rt::test]
    async fn test_status_filter() {
        let store = MemoryStore::new();
        let user = store.create_user("filterer", "h", Role::User).await.unwrap();
        store
            .create_task(user.id, task_input("open", TaskStatus::Todo))
            .await
            .unwrap();
        store
            .create_task(user.id, task_input("doing", TaskStatus::InProgress))
            .await
            .unwrap();

        let mut query = default_query();
        query.status = Some(TaskStatus::InProgress);
        let tasks = store.list_tasks(user.id, &filter(query)).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "doing");
    }

    #[actix_rt::test]
    async fn test_set_user_role() {
        let store = MemoryStore::new();
        let user = store.create_user("promotee", "h", Role::User).await.unwrap();

        let updated = store
            .set_user_role(user.id, Role::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Admin);

        assert!(store.set_user_role(9999, Role::Admin).await.unwrap().is_none());
    }
}
