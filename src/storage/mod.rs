//! Persistence behind a narrow trait: indexed lookups plus insert,
//! whole-record replace, and delete for users, tasks, tags, and
//! preferences. Handlers own every business rule; implementations only
//! move records.

mod memory;
mod mongo;

pub use memory::MemoryStorage;
pub use mongo::MongoStorage;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Task, TaskPriority, TaskStatus, TaskTag, User, UserPreferences};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record store contract. List queries return newest-first by creation
/// time unless noted; per-task tag listing keeps creation order.
#[async_trait]
pub trait Storage: Send + Sync {
    // users
    async fn insert_user(&self, user: &User) -> StorageResult<()>;
    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    // tasks
    async fn insert_task(&self, task: &Task) -> StorageResult<()>;
    async fn task_by_id(&self, task_id: &str) -> StorageResult<Option<Task>>;
    async fn tasks_by_user(&self, user_id: &str) -> StorageResult<Vec<Task>>;
    async fn tasks_by_user_and_status(
        &self,
        user_id: &str,
        status: TaskStatus,
    ) -> StorageResult<Vec<Task>>;
    async fn tasks_by_user_and_priority(
        &self,
        user_id: &str,
        priority: TaskPriority,
    ) -> StorageResult<Vec<Task>>;
    /// Tasks that have a due date at all. Part of the storage contract for
    /// the due-date index; no handler consumes it yet.
    async fn tasks_by_user_with_due_date(&self, user_id: &str) -> StorageResult<Vec<Task>>;
    async fn replace_task(&self, task: &Task) -> StorageResult<()>;
    async fn delete_task(&self, task_id: &str) -> StorageResult<()>;
    async fn task_count(&self, user_id: &str) -> StorageResult<u64>;

    // tags
    async fn insert_tag(&self, tag: &TaskTag) -> StorageResult<()>;
    async fn tag_by_id(&self, tag_id: &str) -> StorageResult<Option<TaskTag>>;
    async fn tags_by_task(&self, task_id: &str) -> StorageResult<Vec<TaskTag>>;
    async fn tags_by_user(&self, user_id: &str) -> StorageResult<Vec<TaskTag>>;
    /// First tag matching user and exact name. Exists to back a uniqueness
    /// check that creation does not currently enforce.
    async fn tag_by_user_and_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> StorageResult<Option<TaskTag>>;
    async fn replace_tag(&self, tag: &TaskTag) -> StorageResult<()>;
    async fn delete_tag(&self, tag_id: &str) -> StorageResult<()>;
    /// Removes every tag on the task, returning how many went away.
    async fn delete_tags_by_task(&self, task_id: &str) -> StorageResult<u64>;
    async fn tag_count(&self, user_id: &str) -> StorageResult<u64>;

    // preferences
    async fn insert_preferences(&self, prefs: &UserPreferences) -> StorageResult<()>;
    async fn preferences_by_user(&self, user_id: &str)
        -> StorageResult<Option<UserPreferences>>;
    async fn replace_preferences(&self, prefs: &UserPreferences) -> StorageResult<()>;
    async fn preferences_count(&self, user_id: &str) -> StorageResult<u64>;
}
