pub mod project;
pub mod tag;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput};
pub use tag::{Tag, TagInput};
pub use task::{SortField, SortOrder, Task, TaskFilter, TaskInput, TaskQuery, TaskStatus};
pub use user::{Role, User, UserSummary};
