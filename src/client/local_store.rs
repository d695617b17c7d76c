use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use crate::errors::StorageResult;
use crate::storage::KeyValueStore;

/// Prefix for the collections owned by the local simulation.
pub const NAMESPACE: &str = "dayone_";
pub const USERS: &str = "users";
pub const TASKS: &str = "tasks";

/// Un-namespaced keys shared with the rest of the client.
pub const TOKEN_KEY: &str = "token";
pub const THEME_KEY: &str = "theme";

/// Whole-collection JSON arrays over a key/value store.
///
/// There is no partial update: callers read the full collection, modify it,
/// and write it back. Two unawaited writers to the same collection race and
/// the later one wins.
#[derive(Clone)]
pub struct LocalStore {
    store: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Absent or corrupt collections read as empty.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let namespaced = format!("{}{}", NAMESPACE, key);
        match self.store.get(&namespaced).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupt collection {}: {}", namespaced, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read collection {}: {}", namespaced, e);
                Vec::new()
            }
        }
    }

    pub async fn write<T: Serialize>(&self, key: &str, records: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&format!("{}{}", NAMESPACE, key), &raw).await
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read {}: {}", key, e);
            None
        })
    }

    pub async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.store.set(key, value).await
    }

    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        self.store.remove(key).await
    }

    pub async fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).await
    }

    pub async fn set_token(&self, token: &str) -> StorageResult<()> {
        self.set(TOKEN_KEY, token).await
    }

    pub async fn clear_token(&self) -> StorageResult<()> {
        self.remove(TOKEN_KEY).await
    }
}
