use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use crate::errors::StorageResult;
use super::KeyValueStore;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    sets: HashMap<String, BTreeSet<String>>,
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        let mut entries = self.lock();
        if entries.values.contains_key(key) {
            return Ok(false);
        }
        entries.values.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.lock();
        entries.values.remove(key);
        entries.sets.remove(key);
        Ok(())
    }

    async fn add_member(&self, key: &str, member: &str) -> StorageResult<()> {
        self.lock()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn remove_member(&self, key: &str, member: &str) -> StorageResult<()> {
        if let Some(set) = self.lock().sets.get_mut(key) {
            set.remove(member);
        }
        Ok(())
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .lock()
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("token", "abc").await.unwrap();
        assert_eq!(other.get("token").await.unwrap().as_deref(), Some("abc"));

        other.remove("token").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_if_absent_keeps_first_value() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("user:a", "first").await.unwrap());
        assert!(!store.set_if_absent("user:a", "second").await.unwrap());
        assert_eq!(store.get("user:a").await.unwrap().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_set_members() {
        let store = MemoryStore::new();
        assert!(store.members("ids").await.unwrap().is_empty());

        store.add_member("ids", "b").await.unwrap();
        store.add_member("ids", "a").await.unwrap();
        store.add_member("ids", "a").await.unwrap();
        assert_eq!(store.members("ids").await.unwrap(), vec!["a", "b"]);

        store.remove_member("ids", "a").await.unwrap();
        store.remove_member("ids", "missing").await.unwrap();
        assert_eq!(store.members("ids").await.unwrap(), vec!["b"]);
    }
}
