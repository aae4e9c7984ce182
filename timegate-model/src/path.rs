//! Property-path parsing, navigation and value application.
//!
//! Path grammar: dot-separated segments, each a field name optionally
//! followed by a bracketed key — `address.city`, `rooms["kitchen"].label`,
//! `scores[3]`. Quoted keys address text-keyed maps; bare integers are
//! converted to the map's declared key kind.
//!
//! Navigation get-or-creates keyed-map entries through the materializer so
//! a partial update can address an entry that does not exist yet. Entries
//! are created in place on the parent map; a copy-on-write map
//! representation could be restored behind [`set_value`] without changing
//! callers.

use crate::error::{ModelResult, PathError};
use crate::registry::TypeRegistry;
use crate::schema::{EntitySchema, FieldKind, KeyKind};
use serde_json::Value;
use std::sync::Arc;

/// A bracketed key in a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathKey {
    /// A quoted string key: `rooms["kitchen"]`.
    Text(String),
    /// A bare integer key: `scores[3]`.
    Ord(i64),
}

/// One parsed segment of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub field: String,
    pub key: Option<PathKey>,
}

/// Parses a path into segments, validating the grammar.
pub fn parse(path: &str) -> Result<Vec<Segment>, PathError> {
    if path.trim().is_empty() {
        return Err(invalid(path));
    }
    path.split('.').map(|part| parse_segment(path, part)).collect()
}

fn parse_segment(path: &str, part: &str) -> Result<Segment, PathError> {
    let Some(open) = part.find('[') else {
        if part.is_empty() {
            return Err(invalid(path));
        }
        return Ok(Segment {
            field: part.to_string(),
            key: None,
        });
    };

    if open == 0 || !part.ends_with(']') {
        return Err(invalid(path));
    }

    let field = part[..open].to_string();
    let inner = &part[open + 1..part.len() - 1];
    let key = if let Some(rest) = inner.strip_prefix('"') {
        let Some(text) = rest.strip_suffix('"') else {
            return Err(invalid(path));
        };
        PathKey::Text(text.to_string())
    } else {
        PathKey::Ord(inner.parse().map_err(|_| invalid(path))?)
    };

    Ok(Segment {
        field,
        key: Some(key),
    })
}

fn invalid(path: &str) -> PathError {
    PathError::InvalidPath {
        path: path.to_string(),
    }
}

/// Applies an encoded value at `path`, creating keyed-map entries as
/// needed. Returns whether the write changed the previous value.
pub fn set_value(
    registry: &TypeRegistry,
    schema: &Arc<EntitySchema>,
    root: &mut Value,
    path: &str,
    encoded: &Value,
) -> ModelResult<bool> {
    let (target, kind) = resolve_target(registry, schema, root, path)?;
    let new_value = decode_value(registry, &kind, encoded)?;
    let changed = *target != new_value;
    *target = new_value;
    Ok(changed)
}

/// Reports whether the value at `path` equals the encoded value, using the
/// target kind's decoding. Navigation get-or-creates map entries exactly
/// like [`set_value`] does.
pub fn values_equal(
    registry: &TypeRegistry,
    schema: &Arc<EntitySchema>,
    root: &mut Value,
    path: &str,
    encoded: &Value,
) -> ModelResult<bool> {
    let (target, kind) = resolve_target(registry, schema, root, path)?;
    let expected = decode_value(registry, &kind, encoded)?;
    Ok(*target == expected)
}

/// Walks the path and returns the terminal slot plus its declared kind.
fn resolve_target<'a>(
    registry: &TypeRegistry,
    schema: &Arc<EntitySchema>,
    root: &'a mut Value,
    path: &str,
) -> ModelResult<(&'a mut Value, FieldKind)> {
    let segments = parse(path)?;
    let last = segments.len() - 1;
    let mut schema = schema.clone();
    let mut node: &'a mut Value = root;

    for (i, segment) in segments.into_iter().enumerate() {
        let field = schema
            .field(&segment.field)
            .cloned()
            .ok_or_else(|| PathError::UnknownField {
                path: path.to_string(),
                field: segment.field.clone(),
                type_name: schema.type_name.clone(),
            })?;

        let Value::Object(container) = node else {
            return Err(PathError::MissingContainer {
                path: path.to_string(),
                field: segment.field.clone(),
            }
            .into());
        };
        let slot: &'a mut Value =
            container
                .get_mut(&segment.field)
                .ok_or_else(|| PathError::MissingContainer {
                    path: path.to_string(),
                    field: segment.field.clone(),
                })?;

        let (target, kind): (&'a mut Value, FieldKind) = match segment.key {
            None => (slot, field.kind.clone()),
            Some(key) => {
                let FieldKind::Map {
                    key: key_kind,
                    value: value_type,
                } = &field.kind
                else {
                    return Err(PathError::NotAMap {
                        path: path.to_string(),
                        field: segment.field.clone(),
                    }
                    .into());
                };

                let key_string = canonical_key(path, &key, key_kind)?;
                let Value::Object(entries) = slot else {
                    return Err(PathError::MissingContainer {
                        path: path.to_string(),
                        field: segment.field.clone(),
                    }
                    .into());
                };

                if !entries.contains_key(&key_string) {
                    let fresh = registry.materialize(value_type)?;
                    entries.insert(key_string.clone(), fresh);
                }
                let entry = entries
                    .get_mut(&key_string)
                    .ok_or_else(|| invalid(path))?;
                (entry, FieldKind::Object(value_type.clone()))
            }
        };

        if i == last {
            return Ok((target, kind));
        }

        let FieldKind::Object(next_type) = &kind else {
            return Err(PathError::NotAnObject {
                path: path.to_string(),
                field: segment.field,
            }
            .into());
        };
        schema = registry.resolve(next_type)?;
        node = target;
    }

    Err(invalid(path).into())
}

/// Canonicalizes a bracketed key against the map's declared key kind.
fn canonical_key(path: &str, key: &PathKey, kind: &KeyKind) -> Result<String, PathError> {
    match (key, kind) {
        (PathKey::Text(text), KeyKind::Text) => Ok(text.clone()),
        (PathKey::Text(text), KeyKind::Int) => {
            let parsed: i64 = text.parse().map_err(|_| PathError::BadKey {
                path: path.to_string(),
                key: text.clone(),
            })?;
            Ok(parsed.to_string())
        }
        (PathKey::Ord(ordinal), _) => Ok(ordinal.to_string()),
    }
}

/// Decodes a transport value against the target field's declared kind.
///
/// String payloads carry JSON text and are parsed then coerced; other
/// values (materializer defaults passed through internally) are used
/// as-is. JSON `null` stands for the kind's zero value.
fn decode_value(registry: &TypeRegistry, kind: &FieldKind, encoded: &Value) -> ModelResult<Value> {
    let raw = match encoded {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => parsed,
            // A text field may receive a bare, unquoted string.
            Err(_) if matches!(kind, FieldKind::Text) => Value::String(text.clone()),
            Err(err) => return Err(PathError::Decode(err).into()),
        },
        other => other.clone(),
    };

    if raw.is_null() {
        return registry.zero_value(kind);
    }

    let fits = match kind {
        FieldKind::Bool => raw.is_boolean(),
        FieldKind::Int => raw.as_i64().is_some() || raw.as_u64().is_some(),
        FieldKind::Float => raw.is_number(),
        FieldKind::Text => raw.is_string(),
        FieldKind::Object(_) | FieldKind::Map { .. } => raw.is_object(),
    };
    if fits {
        Ok(raw)
    } else {
        Err(PathError::TypeMismatch {
            expected: kind.describe(),
            got: json_kind(&raw),
        }
        .into())
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
