use pretty_assertions::assert_eq;
use serde_json::json;
use timegate_model::{EntitySchema, FieldSchema, KeyKind, ModelError, TypeRegistry};

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry.register(EntitySchema::new(
        "address",
        vec![FieldSchema::text("street"), FieldSchema::text("city")],
    ));
    registry.register(EntitySchema::new(
        "employee",
        vec![
            FieldSchema::int("id"),
            FieldSchema::text("name"),
            FieldSchema::bool("active"),
            FieldSchema::float("rating"),
            FieldSchema::object("home", "address"),
            FieldSchema::map("badges", KeyKind::Text, "address"),
        ],
    ));
    registry
}

#[test]
fn resolve_finds_registered_types_only() {
    let registry = registry();
    assert_eq!(registry.resolve("employee").unwrap().type_name, "employee");

    let err = registry.resolve("ghost").unwrap_err();
    assert_eq!(err.0, "ghost");
}

#[test]
fn materialize_builds_a_fully_populated_zero_instance() {
    let registry = registry();
    let value = registry.materialize("employee").unwrap();

    assert_eq!(
        value,
        json!({
            "id": 0,
            "name": "",
            "active": false,
            "rating": 0.0,
            "home": { "street": "", "city": "" },
            "badges": {},
        })
    );
}

#[test]
fn materialized_defaults_are_independent_clones() {
    let registry = registry();
    let mut first = registry.materialize("employee").unwrap();
    first["name"] = json!("mutated");

    let second = registry.materialize("employee").unwrap();
    assert_eq!(second["name"], json!(""));
}

#[test]
fn reregistering_a_type_refreshes_its_default() {
    let registry = registry();
    // Warm the cache.
    let _ = registry.materialize("address").unwrap();

    registry.register(EntitySchema::new(
        "address",
        vec![FieldSchema::text("street"), FieldSchema::int("zip")],
    ));

    let value = registry.materialize("address").unwrap();
    assert_eq!(value, json!({ "street": "", "zip": 0 }));
}

#[test]
fn materializing_an_unregistered_nested_type_fails() {
    let registry = TypeRegistry::new();
    registry.register(EntitySchema::new(
        "order",
        vec![FieldSchema::object("customer", "customer")],
    ));

    let err = registry.materialize("order").unwrap_err();
    assert!(matches!(err, ModelError::Type(_)));
}

#[test]
fn self_referential_schemas_are_rejected_as_cyclic() {
    let registry = TypeRegistry::new();
    registry.register(EntitySchema::new(
        "node",
        vec![FieldSchema::int("id"), FieldSchema::object("next", "node")],
    ));

    let err = registry.materialize("node").unwrap_err();
    assert!(matches!(err, ModelError::SchemaCycle(name) if name == "node"));
}

#[test]
fn map_fields_do_not_recurse_into_the_value_type() {
    // A type that references itself only through a keyed map has a finite
    // default: the empty map.
    let registry = TypeRegistry::new();
    registry.register(EntitySchema::new(
        "category",
        vec![
            FieldSchema::text("label"),
            FieldSchema::map("children", KeyKind::Text, "category"),
        ],
    ));

    let value = registry.materialize("category").unwrap();
    assert_eq!(value, json!({ "label": "", "children": {} }));
}
