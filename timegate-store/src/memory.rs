//! In-memory change store.

use crate::error::{StoreError, StoreResult};
use crate::store::ChangeStore;
use async_trait::async_trait;
use std::collections::HashMap;
use timegate_types::{ChangeId, ChangeRecord, Timestamp};
use tokio::sync::RwLock;

/// A non-durable [`ChangeStore`] backed by a map.
///
/// The reference implementation for tests and embedded single-process
/// setups; ordering semantics match what durable backends must provide.
#[derive(Debug, Default)]
pub struct MemoryChangeStore {
    records: RwLock<HashMap<ChangeId, ChangeRecord>>,
}

impl MemoryChangeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn sorted(mut records: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
        records.sort_by_key(|r| (r.effective_at, r.change_id));
        records
    }
}

#[async_trait]
impl ChangeStore for MemoryChangeStore {
    async fn enqueue(&self, records: &[ChangeRecord]) -> StoreResult<()> {
        let mut held = self.records.write().await;
        for record in records {
            if held.contains_key(&record.change_id) {
                return Err(StoreError::DuplicateChangeId(record.change_id));
            }
            held.insert(record.change_id, record.clone());
        }
        Ok(())
    }

    async fn delete(&self, change_id: ChangeId) -> StoreResult<()> {
        self.records.write().await.remove(&change_id);
        Ok(())
    }

    async fn query_due(&self, to: Timestamp) -> StoreResult<Vec<ChangeRecord>> {
        let held = self.records.read().await;
        let due = held
            .values()
            .filter(|r| r.effective_at <= to)
            .cloned()
            .collect();
        Ok(Self::sorted(due))
    }

    async fn query_range(
        &self,
        type_name: Option<&str>,
        identity: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> StoreResult<Vec<ChangeRecord>> {
        let held = self.records.read().await;
        let matched = held
            .values()
            .filter(|r| {
                type_name.is_none_or(|t| r.type_name == t)
                    && identity.is_none_or(|i| r.identity == i)
                    && r.effective_at >= from
                    && r.effective_at <= to
            })
            .cloned()
            .collect();
        Ok(Self::sorted(matched))
    }

    async fn query_after(&self, cursor: ChangeId) -> StoreResult<Vec<ChangeRecord>> {
        let held = self.records.read().await;
        let matched = held
            .values()
            .filter(|r| r.change_id > cursor)
            .cloned()
            .collect();
        Ok(Self::sorted(matched))
    }
}
