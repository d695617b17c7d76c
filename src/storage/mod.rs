//! String key/value persistence shared by the client (browser-style local
//! storage) and the backend repository.

mod file;
mod memory;
mod redis_store;
#[cfg(test)]
mod yielding;

use async_trait::async_trait;
use crate::errors::StorageResult;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
#[cfg(test)]
pub(crate) use yielding::YieldingStore;

/// Every method is a single atomic step against the backing store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Writes only when `key` is unset. Returns whether the write happened.
    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool>;

    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Adds `member` to the set stored at `key`.
    async fn add_member(&self, key: &str, member: &str) -> StorageResult<()>;

    async fn remove_member(&self, key: &str, member: &str) -> StorageResult<()>;

    /// Set members in no particular order; empty when the set does not exist.
    async fn members(&self, key: &str) -> StorageResult<Vec<String>>;
}
