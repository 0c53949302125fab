//! Storage error types.

use thiserror::Error;

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user {0} not found")]
    UserNotFound(u64),
}
