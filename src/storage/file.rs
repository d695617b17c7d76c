use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use crate::errors::StorageResult;
use super::KeyValueStore;

/// Single JSON object on disk, rewritten in full on every change.
///
/// A missing or unparseable file reads as an empty store, the same way a
/// browser profile with cleared storage behaves.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> BTreeMap<String, String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await?;
        Ok(true)
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn add_member(&self, key: &str, member: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        let mut set = read_set(&entries, key);
        if set.insert(member.to_string()) {
            entries.insert(key.to_string(), serde_json::to_string(&set)?);
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn remove_member(&self, key: &str, member: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await;
        let mut set = read_set(&entries, key);
        if set.remove(member) {
            entries.insert(key.to_string(), serde_json::to_string(&set)?);
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await;
        Ok(read_set(&entries, key).into_iter().collect())
    }
}

// Sets live in the file as JSON arrays under their key
fn read_set(entries: &BTreeMap<String, String>, key: &str) -> BTreeSet<String> {
    entries
        .get(key)
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}
