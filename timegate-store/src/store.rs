//! The Change Store contract.

use crate::error::StoreResult;
use async_trait::async_trait;
use timegate_types::{ChangeId, ChangeRecord, Timestamp};

/// A durable queue and queryable log of change records.
///
/// Every query returns records ascending by `(effective_at, change_id)` —
/// that ordering is the fairness guarantee the poller's fan-out relies on.
/// Bounds are inclusive.
#[async_trait]
pub trait ChangeStore: Send + Sync {
    /// Appends records; each record is durable before this returns.
    async fn enqueue(&self, records: &[ChangeRecord]) -> StoreResult<()>;

    /// Removes a record. Idempotent: deleting an unknown id is a no-op.
    async fn delete(&self, change_id: ChangeId) -> StoreResult<()>;

    /// All records whose effective time is at or before `to`.
    async fn query_due(&self, to: Timestamp) -> StoreResult<Vec<ChangeRecord>>;

    /// Records within an inclusive time range, optionally filtered by type
    /// and identity.
    async fn query_range(
        &self,
        type_name: Option<&str>,
        identity: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> StoreResult<Vec<ChangeRecord>>;

    /// All records with `change_id` strictly after the cursor.
    async fn query_after(&self, cursor: ChangeId) -> StoreResult<Vec<ChangeRecord>>;
}
