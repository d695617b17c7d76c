use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use crate::errors::StorageResult;
use crate::models::{Task, User, UserRecord};
use crate::storage::KeyValueStore;

const USER_INDEX: &str = "users";

/// Backend persistence for users, sessions and tasks.
///
/// Keys: `user:{email}`, `session:{token}` (holds the email),
/// `task:{id}`, `user_tasks:{user_id}` (set of task ids) and `users`
/// (set of every registered email). Index updates are single set operations,
/// so concurrent writers never drop each other's entries.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.store.get(key).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        self.store.set(key, &serde_json::to_string(value)?).await
    }

    pub async fn get_user(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        self.get_json(&format!("user:{}", email)).await
    }

    /// Inserts a new user. Returns `false` without writing when the email is
    /// already taken; concurrent callers for one email get exactly one `true`.
    pub async fn create_user(&self, record: &UserRecord) -> StorageResult<bool> {
        let email = &record.user.email;
        let data = serde_json::to_string(record)?;
        if !self.store.set_if_absent(&format!("user:{}", email), &data).await? {
            return Ok(false);
        }
        self.store.add_member(USER_INDEX, email).await?;
        Ok(true)
    }

    pub async fn list_users(&self) -> StorageResult<Vec<User>> {
        let mut users = Vec::new();
        for email in self.store.members(USER_INDEX).await? {
            match self.get_user(&email).await? {
                Some(record) => users.push(record.user),
                None => tracing::warn!("User index references missing user {}", email),
            }
        }
        Ok(users)
    }

    /// Mints an opaque bearer token bound to `email`.
    pub async fn create_session(&self, email: &str) -> StorageResult<String> {
        let token = uuid::Uuid::new_v4().to_string();
        self.store.set(&format!("session:{}", token), email).await?;
        Ok(token)
    }

    pub async fn session_user(&self, token: &str) -> StorageResult<Option<User>> {
        let Some(email) = self.store.get(&format!("session:{}", token)).await? else {
            return Ok(None);
        };
        Ok(self.get_user(&email).await?.map(|record| record.user))
    }

    pub async fn get_task(&self, task_id: &str) -> StorageResult<Option<Task>> {
        self.get_json(&format!("task:{}", task_id)).await
    }

    /// Insert or replace. The task id joins its owner's index set.
    pub async fn save_task(&self, task: &Task) -> StorageResult<()> {
        self.set_json(&format!("task:{}", task.id), task).await?;
        self.store
            .add_member(&format!("user_tasks:{}", task.user_id), &task.id)
            .await
    }

    pub async fn list_tasks(&self, user_id: &str) -> StorageResult<Vec<Task>> {
        let mut tasks = Vec::new();
        for task_id in self.store.members(&format!("user_tasks:{}", user_id)).await? {
            match self.get_task(&task_id).await? {
                Some(task) => tasks.push(task),
                None => tracing::warn!("Task {} not found for user {}", task_id, user_id),
            }
        }
        Ok(tasks)
    }

    pub async fn delete_task(&self, task: &Task) -> StorageResult<()> {
        self.store
            .remove_member(&format!("user_tasks:{}", task.user_id), &task.id)
            .await?;
        self.store.remove(&format!("task:{}", task.id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Role, TaskStatus};
    use crate::storage::{MemoryStore, YieldingStore};

    fn record(email: &str) -> UserRecord {
        UserRecord {
            user: User {
                id: format!("id-{}", email),
                name: "Someone".into(),
                email: email.into(),
                role: Role::User,
            },
            password_hash: "hash".into(),
        }
    }

    fn task(id: &str, owner: &str) -> Task {
        Task {
            id: id.into(),
            title: "t".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Low,
            due_date: String::new(),
            user_id: owner.into(),
        }
    }

    #[tokio::test]
    async fn test_sessions_resolve_to_users() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        assert!(repo.create_user(&record("ada@x.com")).await.unwrap());
        assert!(!repo.create_user(&record("ada@x.com")).await.unwrap());

        let token = repo.create_session("ada@x.com").await.unwrap();
        let user = repo.session_user(&token).await.unwrap().unwrap();
        assert_eq!(user.email, "ada@x.com");
        assert!(repo.session_user("nope").await.unwrap().is_none());

        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_task_index_per_owner() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        repo.save_task(&task("1", "a")).await.unwrap();
        repo.save_task(&task("2", "a")).await.unwrap();
        repo.save_task(&task("3", "b")).await.unwrap();
        repo.save_task(&task("1", "a")).await.unwrap();

        assert_eq!(repo.list_tasks("a").await.unwrap().len(), 2);

        repo.delete_task(&task("1", "a")).await.unwrap();
        let remaining = repo.list_tasks("a").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "2");
        assert!(repo.get_task("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_refuses_taken_email() {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        assert!(repo.create_user(&record("ada@x.com")).await.unwrap());

        let mut other = record("ada@x.com");
        other.user.id = "someone-else".into();
        assert!(!repo.create_user(&other).await.unwrap());

        let stored = repo.get_user("ada@x.com").await.unwrap().unwrap();
        assert_eq!(stored.user.id, "id-ada@x.com");
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_every_task_indexed() {
        let repo = Repository::new(Arc::new(YieldingStore::default()));
        let mut writers = tokio::task::JoinSet::new();
        for i in 0..20 {
            let repo = repo.clone();
            writers.spawn(async move { repo.save_task(&task(&i.to_string(), "a")).await });
        }
        while let Some(result) = writers.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(repo.list_tasks("a").await.unwrap().len(), 20);
    }
}
