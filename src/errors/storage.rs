use thiserror::Error;
use redis::RedisError;
use std::io;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("File error: {0}")]
    File(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
