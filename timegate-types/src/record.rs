//! Change records.
//!
//! A change record is one logical, time-gated edit to one entity instance:
//! a path → encoded-value map plus the identity it targets and the instant
//! at which it becomes applicable. Records are immutable once built and are
//! the unit of storage, delivery and application throughout the engine.
//!
//! The value encoding is transport-neutral: every value written by the
//! constructors is a JSON text string, decoded against the target field's
//! declared kind at apply time. JSON `null` stands for "reset to the
//! field's zero value".

use crate::{ChangeId, ChangeIdSource, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One logical change to one entity instance.
///
/// `changes` maps property paths (see `timegate-model`'s path grammar) to
/// encoded values. Keys are unique; application walks them in insertion
/// order. An empty map is legal and applies as a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Process-wide monotonic identifier; tie breaker and cursor.
    pub change_id: ChangeId,

    /// Registered type of the target entity.
    pub type_name: String,

    /// The instant at which this record becomes applicable.
    pub effective_at: Timestamp,

    /// Natural key of the target instance within its type.
    pub identity: String,

    /// Property path → encoded value.
    pub changes: Map<String, Value>,

    /// Free-form metadata (e.g. actor identity); never interpreted here.
    #[serde(default)]
    pub user_info: HashMap<String, String>,
}

impl ChangeRecord {
    /// Builds a snapshot record from a full instance.
    ///
    /// The instance is serialized and flattened into one change per
    /// top-level field; nested structures are captured as a single encoded
    /// blob under their field's path. Deterministic for a given instance.
    pub fn snapshot<T: Serialize>(
        ids: &ChangeIdSource,
        type_name: impl Into<String>,
        effective_at: Timestamp,
        identity: impl Into<String>,
        instance: &T,
        user_info: HashMap<String, String>,
    ) -> crate::Result<Self> {
        let serialized = serde_json::to_value(instance)?;
        let Value::Object(fields) = serialized else {
            return Err(crate::Error::SnapshotNotAnObject(json_kind(&serialized)));
        };

        let mut changes = Map::new();
        for (name, value) in fields {
            changes.insert(name, Value::String(value.to_string()));
        }

        Ok(Self {
            change_id: ids.next_id(),
            type_name: type_name.into(),
            effective_at,
            identity: identity.into(),
            changes,
            user_info,
        })
    }

    /// Starts a partial-update record; finish with [`PartialUpdate::build`].
    #[must_use]
    pub fn partial(
        ids: &ChangeIdSource,
        type_name: impl Into<String>,
        effective_at: Timestamp,
        identity: impl Into<String>,
        user_info: HashMap<String, String>,
    ) -> PartialUpdate {
        PartialUpdate {
            record: Self {
                change_id: ids.next_id(),
                type_name: type_name.into(),
                effective_at,
                identity: identity.into(),
                changes: Map::new(),
                user_info,
            },
        }
    }
}

/// Builder for partial-update records.
///
/// Each `set` records one path/value pair. Setting the same path twice
/// keeps only the later value (map semantics).
#[derive(Debug)]
pub struct PartialUpdate {
    record: ChangeRecord,
}

impl PartialUpdate {
    /// Records an edit: the field at `path` becomes `value`.
    pub fn set<V: Serialize>(mut self, path: impl Into<String>, value: &V) -> crate::Result<Self> {
        let encoded = serde_json::to_string(value)?;
        self.record.changes.insert(path.into(), Value::String(encoded));
        Ok(self)
    }

    /// Records a reset: the field at `path` returns to its zero value.
    #[must_use]
    pub fn clear(mut self, path: impl Into<String>) -> Self {
        self.record.changes.insert(path.into(), Value::Null);
        self
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> ChangeRecord {
        self.record
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
