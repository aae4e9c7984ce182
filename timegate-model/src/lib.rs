//! Entity model layer for Timegate — schemas, materialization and paths.
//!
//! The engine applies changes to entities it knows nothing about at compile
//! time. This crate supplies the registration-time machinery that makes
//! that possible without runtime reflection:
//!
//! - **Schemas** describe a type's fields and their kinds; the registry
//!   resolves a record's `type_name` to its schema.
//! - **Materialization** builds a zero-value instance of a registered type
//!   with every nested container present, so partial-path navigation never
//!   lands on a missing object.
//! - **The path engine** parses dotted/bracketed property paths, navigates
//!   (and get-or-creates) nested containers, decodes transport values
//!   against the target field's declared kind, and reports whether a write
//!   actually changed anything.
//!
//! Entity instances are plain `serde_json::Value` objects shaped by their
//! schema.

mod error;
mod path;
mod registry;
mod schema;

pub use error::{ModelError, ModelResult, PathError, TypeResolutionError};
pub use path::{parse, set_value, values_equal, PathKey, Segment};
pub use registry::TypeRegistry;
pub use schema::{EntitySchema, FieldKind, FieldSchema, KeyKind};
