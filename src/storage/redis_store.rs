use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use crate::errors::StorageResult;
use super::KeyValueStore;

pub struct RedisStore {
    client: Arc<Client>,
}

impl RedisStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl Clone for RedisStore {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone()
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StorageResult<bool> {
        let mut conn = self.client.get_async_connection().await?;
        let written: bool = conn.set_nx(key, value).await?;
        Ok(written)
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn add_member(&self, key: &str, member: &str) -> StorageResult<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.sadd::<_, _, ()>(key, member).await?;
        Ok(())
    }

    async fn remove_member(&self, key: &str, member: &str) -> StorageResult<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.srem::<_, _, ()>(key, member).await?;
        Ok(())
    }

    async fn members(&self, key: &str) -> StorageResult<Vec<String>> {
        let mut conn = self.client.get_async_connection().await?;
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }
}
