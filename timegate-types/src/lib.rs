//! Core type definitions for Timegate.
//!
//! This crate defines the fundamental, schema-agnostic types used throughout
//! the change-propagation engine:
//! - Change identifiers and the monotonic id source
//! - UTC millisecond timestamps and the injectable clock
//! - Change records (snapshot and partial-update constructors)
//!
//! Entity schemas, path semantics and the apply machinery live in
//! `timegate-model` and `timegate-engine`, not here.

mod clock;
mod ids;
mod record;
mod timestamp;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{ChangeId, ChangeIdSource};
pub use record::{ChangeRecord, PartialUpdate};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing change records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot source must serialize to an object, got {0}")]
    SnapshotNotAnObject(&'static str),
}
