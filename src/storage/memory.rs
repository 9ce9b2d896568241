use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Task, TaskPriority, TaskStatus, TaskTag, User, UserPreferences};
use crate::storage::{Storage, StorageResult};

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    tasks: HashMap<String, Task>,
    tags: HashMap<String, TaskTag>,
    // keyed by user id: at most one record per user
    preferences: HashMap<String, UserPreferences>,
}

/// HashMap-backed store used by the test suite. Mirrors the MongoDB
/// implementation's ordering so the two are interchangeable behind the
/// trait.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tasks
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .users
            .insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>> {
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert_task(&self, task: &Task) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .tasks
            .insert(task.task_id.clone(), task.clone());
        Ok(())
    }

    async fn task_by_id(&self, task_id: &str) -> StorageResult<Option<Task>> {
        Ok(self.inner.read().await.tasks.get(task_id).cloned())
    }

    async fn tasks_by_user(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let tasks = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first_tasks(tasks))
    }

    async fn tasks_by_user_and_status(
        &self,
        user_id: &str,
        status: TaskStatus,
    ) -> StorageResult<Vec<Task>> {
        let tasks = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.user_id == user_id && task.status == status)
            .cloned()
            .collect();
        Ok(newest_first_tasks(tasks))
    }

    async fn tasks_by_user_and_priority(
        &self,
        user_id: &str,
        priority: TaskPriority,
    ) -> StorageResult<Vec<Task>> {
        let tasks = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.user_id == user_id && task.priority == priority)
            .cloned()
            .collect();
        Ok(newest_first_tasks(tasks))
    }

    async fn tasks_by_user_with_due_date(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let tasks = self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.user_id == user_id && task.due_date.is_some())
            .cloned()
            .collect();
        Ok(newest_first_tasks(tasks))
    }

    async fn replace_task(&self, task: &Task) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        if inner.tasks.contains_key(&task.task_id) {
            inner.tasks.insert(task.task_id.clone(), task.clone());
        }
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> StorageResult<()> {
        self.inner.write().await.tasks.remove(task_id);
        Ok(())
    }

    async fn task_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(self
            .inner
            .read()
            .await
            .tasks
            .values()
            .filter(|task| task.user_id == user_id)
            .count() as u64)
    }

    async fn insert_tag(&self, tag: &TaskTag) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .tags
            .insert(tag.tag_id.clone(), tag.clone());
        Ok(())
    }

    async fn tag_by_id(&self, tag_id: &str) -> StorageResult<Option<TaskTag>> {
        Ok(self.inner.read().await.tags.get(tag_id).cloned())
    }

    async fn tags_by_task(&self, task_id: &str) -> StorageResult<Vec<TaskTag>> {
        let mut tags: Vec<TaskTag> = self
            .inner
            .read()
            .await
            .tags
            .values()
            .filter(|tag| tag.task_id == task_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tags)
    }

    async fn tags_by_user(&self, user_id: &str) -> StorageResult<Vec<TaskTag>> {
        let mut tags: Vec<TaskTag> = self
            .inner
            .read()
            .await
            .tags
            .values()
            .filter(|tag| tag.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tags)
    }

    async fn tag_by_user_and_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> StorageResult<Option<TaskTag>> {
        Ok(self
            .inner
            .read()
            .await
            .tags
            .values()
            .find(|tag| tag.user_id == user_id && tag.name == name)
            .cloned())
    }

    async fn replace_tag(&self, tag: &TaskTag) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        if inner.tags.contains_key(&tag.tag_id) {
            inner.tags.insert(tag.tag_id.clone(), tag.clone());
        }
        Ok(())
    }

    async fn delete_tag(&self, tag_id: &str) -> StorageResult<()> {
        self.inner.write().await.tags.remove(tag_id);
        Ok(())
    }

    async fn delete_tags_by_task(&self, task_id: &str) -> StorageResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.tags.len();
        inner.tags.retain(|_, tag| tag.task_id != task_id);
        Ok((before - inner.tags.len()) as u64)
    }

    async fn tag_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(self
            .inner
            .read()
            .await
            .tags
            .values()
            .filter(|tag| tag.user_id == user_id)
            .count() as u64)
    }

    async fn insert_preferences(&self, prefs: &UserPreferences) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .preferences
            .insert(prefs.user_id.clone(), prefs.clone());
        Ok(())
    }

    async fn preferences_by_user(
        &self,
        user_id: &str,
    ) -> StorageResult<Option<UserPreferences>> {
        Ok(self.inner.read().await.preferences.get(user_id).cloned())
    }

    async fn replace_preferences(&self, prefs: &UserPreferences) -> StorageResult<()> {
        self.inner
            .write()
            .await
            .preferences
            .insert(prefs.user_id.clone(), prefs.clone());
        Ok(())
    }

    async fn preferences_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(u64::from(
            self.inner.read().await.preferences.contains_key(user_id),
        ))
    }
}
