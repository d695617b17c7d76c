// Error types for the backend (AppError), the storage layer (StorageError)
// and the client request layer (ApiError).
use thiserror::Error;

pub mod api;
pub mod response;
pub mod storage;

// Re-export commonly used types
pub use api::{ApiError, ErrorKind};
pub use storage::{StorageError, StorageResult};

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
