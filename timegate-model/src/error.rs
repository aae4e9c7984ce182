//! Error types for the model layer.
//!
//! Path and type-resolution failures are data/schema bugs: they surface
//! synchronously to the caller of an apply and are never retried.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// A record's `type_name` does not resolve to a registered schema.
#[derive(Debug, Error)]
#[error("type {0} is not registered")]
pub struct TypeResolutionError(pub String);

/// An invalid or unknown property path, or a value that does not fit the
/// field it addresses.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("property path [{path}] is invalid")]
    InvalidPath { path: String },

    #[error("property path [{path}]: no field {field} on type {type_name}")]
    UnknownField {
        path: String,
        field: String,
        type_name: String,
    },

    #[error("property path [{path}]: container for {field} is absent")]
    MissingContainer { path: String, field: String },

    #[error("property path [{path}]: field {field} is not a keyed map")]
    NotAMap { path: String, field: String },

    #[error("property path [{path}]: field {field} is not an object")]
    NotAnObject { path: String, field: String },

    #[error("property path [{path}]: key {key} does not fit the map's declared key kind")]
    BadKey { path: String, key: String },

    #[error("encoded value is not valid JSON text: {0}")]
    Decode(serde_json::Error),

    #[error("expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
}

/// Errors that can occur in model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Type(#[from] TypeResolutionError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("schema nesting too deep resolving {0}; cyclic schema?")]
    SchemaCycle(String),
}
