//! Change applier — the materialized-view writer.

use crate::error::ApplyError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use timegate_model::{set_value, TypeRegistry};
use timegate_types::ChangeRecord;
use tokio::sync::RwLock;
use tracing::debug;

/// Applies change records to a materialized view.
///
/// Delivery is at-least-once, so implementations must be idempotent:
/// applying the same record twice leaves the same state as applying it
/// once.
#[async_trait]
pub trait ChangeApplier: Send + Sync {
    /// Applies one record. All of the record's edits are attempted in the
    /// record's own order; a path or type failure aborts this record only.
    async fn apply(&self, record: &ChangeRecord) -> Result<(), ApplyError>;
}

/// In-memory materialized view: type name → identity → entity instance.
///
/// Entities are created lazily on the first applied change, fully
/// materialized through the registry so every nested container is present.
/// Creation is first-writer-wins; field mutation is last-write-wins in
/// application order.
pub struct MemoryRepository {
    registry: Arc<TypeRegistry>,
    entities: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryRepository {
    /// Creates an empty repository over a registry.
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this repository materializes entities from.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the latest applied state of an entity, or `None` if no
    /// change has ever been applied for this identity.
    pub async fn get_current(&self, type_name: &str, identity: &str) -> Option<Value> {
        self.entities
            .read()
            .await
            .get(type_name)
            .and_then(|per_type| per_type.get(identity))
            .cloned()
    }

    /// Like [`get_current`](Self::get_current) but decoded into a caller
    /// type.
    pub async fn get_current_as<T: DeserializeOwned>(
        &self,
        type_name: &str,
        identity: &str,
    ) -> Result<Option<T>, ApplyError> {
        match self.get_current(type_name, identity).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ChangeApplier for MemoryRepository {
    async fn apply(&self, record: &ChangeRecord) -> Result<(), ApplyError> {
        let schema = self.registry.resolve(&record.type_name)?;

        let mut entities = self.entities.write().await;
        let per_type = entities.entry(record.type_name.clone()).or_default();
        let entity = match per_type.entry(record.identity.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.registry.materialize(&record.type_name)?),
        };

        for (path, value) in &record.changes {
            let changed = set_value(&self.registry, &schema, entity, path, value)?;
            debug!(
                change_id = %record.change_id,
                identity = %record.identity,
                path,
                changed,
                "applied edit"
            );
        }
        Ok(())
    }
}
