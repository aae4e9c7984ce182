//! Error types for the store layer.

use thiserror::Error;
use timegate_types::ChangeId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this id is already enqueued.
    #[error("change {0} is already enqueued")]
    DuplicateChangeId(ChangeId),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (database, network).
    #[error("backend error: {0}")]
    Backend(String),
}
