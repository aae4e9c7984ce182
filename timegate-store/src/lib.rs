//! Change Store layer for Timegate.
//!
//! Defines the [`ChangeStore`] contract the engine depends on, a
//! durable append/query/delete surface for change records — plus the
//! in-memory reference implementation used in tests and embedded setups.
//!
//! Durable backends (relational queues, logs) implement the same contract
//! out of tree; the engine never sees past it.

mod error;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryChangeStore;
pub use store::ChangeStore;
