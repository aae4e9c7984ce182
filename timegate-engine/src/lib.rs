//! Change propagation engine for Timegate.
//!
//! Pulls due change records out of a pending [`ChangeStore`], fans them out
//! to bounded-queue receivers, and applies them to a materialized view.
//!
//! # Components
//!
//! - **Applier**: gets-or-creates the target entity and applies a record's
//!   path edits through the path engine
//! - **Receiver**: a bounded single-consumer queue decoupling delivery rate
//!   from processing rate
//! - **Poller**: the temporal scheduler draining due records and retrying
//!   delivery forever
//! - **Pipeline**: wires the standard deployment (pending store →
//!   repository + history log)
//!
//! # Flow
//!
//! ```text
//! producer → pending store → poller (time-gated drain)
//!                               ├→ receiver → repository (materialized view)
//!                               └→ receiver → history store
//! ```
//!
//! Delivery is at-least-once: the poller deletes a record only after every
//! receiver accepted it, and appliers must tolerate redelivery.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use timegate_engine::{MemoryRepository, PollerConfig, TemporalPipeline};
//! use timegate_model::{EntitySchema, FieldSchema, TypeRegistry};
//! use timegate_store::MemoryChangeStore;
//! use timegate_types::SystemClock;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register(EntitySchema::new(
//!     "employee",
//!     vec![FieldSchema::int("id"), FieldSchema::text("name")],
//! ));
//!
//! let pending = Arc::new(MemoryChangeStore::new());
//! let repository = Arc::new(MemoryRepository::new(registry));
//! let pipeline = TemporalPipeline::start(
//!     pending,
//!     repository,
//!     None,
//!     Arc::new(SystemClock),
//!     PollerConfig::default(),
//! );
//! # drop(pipeline);
//! ```

mod applier;
mod error;
mod pipeline;
mod poller;
mod receiver;

pub use applier::{ChangeApplier, MemoryRepository};
pub use error::{ApplyError, DeliveryError};
pub use pipeline::TemporalPipeline;
pub use poller::{ChangePoller, PollerConfig};
pub use receiver::{ChangeHandler, ChangeReceiver, HistoryHandler, RepositoryHandler};

// Re-exported so embedders can name the store contract without a direct
// dependency on the store crate.
pub use timegate_store::ChangeStore;
