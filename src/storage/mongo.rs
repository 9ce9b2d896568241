use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::models::{Task, TaskPriority, TaskStatus, TaskTag, User, UserPreferences};
use crate::storage::{Storage, StorageResult};

const USERS: &str = "users";
const TASKS: &str = "tasks";
const TASK_TAGS: &str = "task_tags";
const USER_PREFERENCES: &str = "user_preferences";

/// MongoDB-backed store. One database, four collections, records keyed by
/// their application-level id fields rather than `_id`.
pub struct MongoStorage {
    pub client: Client,
    pub db: Database,
}

impl MongoStorage {
    pub async fn init(uri: &str, db_name: &str) -> Self {
        let client_options = ClientOptions::parse(uri)
            .await
            .expect("Failed to parse MongoDB connection string");
        let client = Client::with_options(client_options).expect("Failed to initialize client");
        let db = client.database(db_name);
        MongoStorage { client, db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS)
    }

    fn tasks(&self) -> Collection<Task> {
        self.db.collection::<Task>(TASKS)
    }

    fn tags(&self) -> Collection<TaskTag> {
        self.db.collection::<TaskTag>(TASK_TAGS)
    }

    fn preferences(&self) -> Collection<UserPreferences> {
        self.db.collection::<UserPreferences>(USER_PREFERENCES)
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn user_by_id(&self, user_id: &str) -> StorageResult<Option<User>> {
        Ok(self.users().find_one(doc! { "user_id": user_id }).await?)
    }

    async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_task(&self, task: &Task) -> StorageResult<()> {
        self.tasks().insert_one(task).await?;
        Ok(())
    }

    async fn task_by_id(&self, task_id: &str) -> StorageResult<Option<Task>> {
        Ok(self.tasks().find_one(doc! { "task_id": task_id }).await?)
    }

    async fn tasks_by_user(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let cursor = self
            .tasks()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn tasks_by_user_and_status(
        &self,
        user_id: &str,
        status: TaskStatus,
    ) -> StorageResult<Vec<Task>> {
        let cursor = self
            .tasks()
            .find(doc! { "user_id": user_id, "status": status.as_str() })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn tasks_by_user_and_priority(
        &self,
        user_id: &str,
        priority: TaskPriority,
    ) -> StorageResult<Vec<Task>> {
        let cursor = self
            .tasks()
            .find(doc! { "user_id": user_id, "priority": priority.as_str() })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn tasks_by_user_with_due_date(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let cursor = self
            .tasks()
            .find(doc! { "user_id": user_id, "due_date": { "$ne": null } })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn replace_task(&self, task: &Task) -> StorageResult<()> {
        self.tasks()
            .replace_one(doc! { "task_id": &task.task_id }, task)
            .await?;
        Ok(())
    }

    async fn delete_task(&self, task_id: &str) -> StorageResult<()> {
        self.tasks().delete_one(doc! { "task_id": task_id }).await?;
        Ok(())
    }

    async fn task_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(self
            .tasks()
            .count_documents(doc! { "user_id": user_id })
            .await?)
    }

    async fn insert_tag(&self, tag: &TaskTag) -> StorageResult<()> {
        self.tags().insert_one(tag).await?;
        Ok(())
    }

    async fn tag_by_id(&self, tag_id: &str) -> StorageResult<Option<TaskTag>> {
        Ok(self.tags().find_one(doc! { "tag_id": tag_id }).await?)
    }

    async fn tags_by_task(&self, task_id: &str) -> StorageResult<Vec<TaskTag>> {
        let cursor = self
            .tags()
            .find(doc! { "task_id": task_id })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn tags_by_user(&self, user_id: &str) -> StorageResult<Vec<TaskTag>> {
        let cursor = self
            .tags()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn tag_by_user_and_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> StorageResult<Option<TaskTag>> {
        Ok(self
            .tags()
            .find_one(doc! { "user_id": user_id, "name": name })
            .await?)
    }

    async fn replace_tag(&self, tag: &TaskTag) -> StorageResult<()> {
        self.tags()
            .replace_one(doc! { "tag_id": &tag.tag_id }, tag)
            .await?;
        Ok(())
    }

    async fn delete_tag(&self, tag_id: &str) -> StorageResult<()> {
        self.tags().delete_one(doc! { "tag_id": tag_id }).await?;
        Ok(())
    }

    async fn delete_tags_by_task(&self, task_id: &str) -> StorageResult<u64> {
        let result = self
            .tags()
            .delete_many(doc! { "task_id": task_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn tag_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(self
            .tags()
            .count_documents(doc! { "user_id": user_id })
            .await?)
    }

    async fn insert_preferences(&self, prefs: &UserPreferences) -> StorageResult<()> {
        self.preferences().insert_one(prefs).await?;
        Ok(())
    }

    async fn preferences_by_user(
        &self,
        user_id: &str,
    ) -> StorageResult<Option<UserPreferences>> {
        Ok(self
            .preferences()
            .find_one(doc! { "user_id": user_id })
            .await?)
    }

    async fn replace_preferences(&self, prefs: &UserPreferences) -> StorageResult<()> {
        self.preferences()
            .replace_one(doc! { "user_id": &prefs.user_id }, prefs)
            .await?;
        Ok(())
    }

    async fn preferences_count(&self, user_id: &str) -> StorageResult<u64> {
        Ok(self
            .preferences()
            .count_documents(doc! { "user_id": user_id })
            .await?)
    }
}
