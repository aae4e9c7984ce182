//! Error types for the engine.

use thiserror::Error;

/// Errors that can occur while applying a change record.
///
/// All of these are local to one record: the path or type on the record is
/// wrong (a data/schema bug), or the downstream effect's own backend
/// failed. They are surfaced to the receiver, not retried by it.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Path navigation, decoding or type resolution failed.
    #[error(transparent)]
    Model(#[from] timegate_model::ModelError),

    /// The downstream store rejected the record.
    #[error(transparent)]
    Store(#[from] timegate_store::StoreError),

    /// Reading a materialized entity back into a caller type failed.
    #[error("entity decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<timegate_model::PathError> for ApplyError {
    fn from(err: timegate_model::PathError) -> Self {
        Self::Model(err.into())
    }
}

impl From<timegate_model::TypeResolutionError> for ApplyError {
    fn from(err: timegate_model::TypeResolutionError) -> Self {
        Self::Model(err.into())
    }
}

/// A push into a receiver could not be accepted.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The receiver has shut down and its queue is closed.
    #[error("receiver is shut down")]
    Closed,
}
