//! Entity schemas — the registration-time replacement for reflection.

use serde::{Deserialize, Serialize};

/// The declared key type of a keyed-map field.
///
/// Map keys are stored as JSON object keys (strings); the kind controls how
/// bracketed path keys are validated and canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Text,
    Int,
}

/// The declared kind of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    /// A nested value holder of another registered type.
    Object(String),
    /// A keyed collection; values are instances of a registered type.
    Map { key: KeyKind, value: String },
}

impl FieldKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            FieldKind::Bool => "a boolean",
            FieldKind::Int => "an integer",
            FieldKind::Float => "a number",
            FieldKind::Text => "a string",
            FieldKind::Object(_) => "an object",
            FieldKind::Map { .. } => "a keyed map",
        }
    }
}

/// One field of an entity schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a boolean field.
    pub fn bool(name: &str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// Shorthand for an integer field.
    pub fn int(name: &str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    /// Shorthand for a floating-point field.
    pub fn float(name: &str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    /// Shorthand for a text field.
    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Shorthand for a nested object field of a registered type.
    pub fn object(name: &str, type_name: &str) -> Self {
        Self::new(name, FieldKind::Object(type_name.into()))
    }

    /// Shorthand for a keyed-map field with registered value type.
    pub fn map(name: &str, key: KeyKind, value_type: &str) -> Self {
        Self::new(
            name,
            FieldKind::Map {
                key,
                value: value_type.into(),
            },
        )
    }
}

/// Describes a registered entity type: its stable name and field table.
///
/// The field table is built once at registration and consulted on every
/// path navigation — there is no type introspection in the apply path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub type_name: String,
    pub fields: Vec<FieldSchema>,
}

impl EntitySchema {
    /// Creates a schema from a field table.
    #[must_use]
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}
