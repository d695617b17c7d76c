use async_trait::async_trait;
use crate::errors::StorageResult;
use super::{KeyValueStore, MemoryStore};

/// `MemoryStore` that yields before every call, so concurrent tasks
/// interleave between storage steps the way they do over a network store.
#[derive(Debug, Clone, Default)]
pub struct YieldingStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for YieldingStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.set(key, value).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        tokio::task::yield_now().await;
        self.inner.set_if_absent(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.remove(key).await
    }

    async fn add_member(&self, key: &str, member: &str) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.add_member(key, member).await
    }

    async fn remove_member(&self, key: &str, member: &str) -> StorageResult<()> {
        tokio::task::yield_now().await;
        self.inner.remove_member(key, member).await
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        tokio::task::yield_now().await;
        self.inner.members(key).await
    }
}
