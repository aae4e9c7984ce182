//! Type registry and zero-value materializer.

use crate::error::{ModelError, ModelResult, TypeResolutionError};
use crate::schema::{EntitySchema, FieldKind};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Nesting limit for materialization; a schema deeper than this is
/// treated as cyclic.
const MAX_NESTING: usize = 64;

/// Process-wide mapping from type name to schema, plus a cache of
/// materialized defaults.
///
/// Both maps are append-only and safe to share across threads. The default
/// for a type is derived once (derivation walks the whole schema tree) and
/// cloned per use.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    schemas: RwLock<HashMap<String, Arc<EntitySchema>>>,
    defaults: RwLock<HashMap<String, Value>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its type name.
    ///
    /// Re-registering a name replaces the schema and drops any cached
    /// default derived from the old one.
    pub fn register(&self, schema: EntitySchema) {
        let name = schema.type_name.clone();
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), Arc::new(schema));
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name);
    }

    /// Resolves a type name to its schema.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<EntitySchema>, TypeResolutionError> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
            .ok_or_else(|| TypeResolutionError(type_name.to_string()))
    }

    /// Produces a zero-value instance of a registered type.
    ///
    /// Every field is present: scalars at their zero values, nested objects
    /// recursively materialized, keyed maps as the canonical empty map.
    pub fn materialize(&self, type_name: &str) -> ModelResult<Value> {
        if let Some(cached) = self
            .defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
        {
            return Ok(cached.clone());
        }

        let built = self.build_default(type_name, 0)?;
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_string(), built.clone());
        Ok(built)
    }

    /// The zero value for a field kind.
    pub fn zero_value(&self, kind: &FieldKind) -> ModelResult<Value> {
        Ok(match kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Int => Value::from(0i64),
            FieldKind::Float => Value::from(0.0f64),
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Object(type_name) => self.materialize(type_name)?,
            FieldKind::Map { .. } => Value::Object(Map::new()),
        })
    }

    fn build_default(&self, type_name: &str, depth: usize) -> ModelResult<Value> {
        if depth > MAX_NESTING {
            return Err(ModelError::SchemaCycle(type_name.to_string()));
        }

        let schema = self.resolve(type_name)?;
        let mut object = Map::new();
        for field in &schema.fields {
            let value = match &field.kind {
                FieldKind::Bool => Value::Bool(false),
                FieldKind::Int => Value::from(0i64),
                FieldKind::Float => Value::from(0.0f64),
                FieldKind::Text => Value::String(String::new()),
                FieldKind::Object(nested) => self.build_default(nested, depth + 1)?,
                FieldKind::Map { .. } => Value::Object(Map::new()),
            };
            object.insert(field.name.clone(), value);
        }
        Ok(Value::Object(object))
    }
}
