//! Collection construction and indexing scenarios over the public API.

use datamap::collection::{CollectionKey, KeyedCollection, SerializerRegistry};
use datamap::hydration::{EntityFactory, HydratedEntity};
use datamap::schema::{EntitySchema, FieldSchema, ScalarType};
use datamap::storage::CollectionFactory;
use datamap::DataMapError;
use serde_json::{json, Value};

fn user_factory() -> EntityFactory {
    let _ = env_logger::builder().is_test(true).try_init();
    let schema = EntitySchema::new("user")
        .with_field(FieldSchema::scalar("id", ScalarType::Integer))
        .with_field(FieldSchema::scalar("name", ScalarType::String));
    EntityFactory::new(schema).unwrap()
}

fn users(ids: &[i64]) -> Vec<HydratedEntity> {
    let factory = user_factory();
    ids.iter()
        .map(|id| {
            let raw = json!({"id": id, "name": format!("user-{id}")});
            factory.build(raw.as_object().unwrap()).unwrap()
        })
        .collect()
}

#[test]
fn keyed_lookup_returns_matching_item() {
    let collection = KeyedCollection::create(users(&[1, 2, 3]), "user", Some("id"), None).unwrap();

    assert_eq!(collection.count(), 3);
    let item = collection.get_by_key(2).unwrap();
    assert_eq!(item.get("name"), Some(&json!("user-2")));
    assert!(collection.get_by_key(9).is_none());
}

#[test]
fn duplicate_ids_fail_construction() {
    let err = KeyedCollection::create(users(&[1, 2, 2]), "user", Some("id"), None).unwrap_err();

    match err {
        DataMapError::DuplicateKey { field, value } => {
            assert_eq!(field, "id");
            assert_eq!(value, "2");
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn positional_collection_keys_are_input_order() {
    let collection = KeyedCollection::create(users(&[9, 7, 8]), "user", None, None).unwrap();

    let keys: Vec<&CollectionKey> = collection.keys().collect();
    assert_eq!(
        keys,
        [&CollectionKey::Int(0), &CollectionKey::Int(1), &CollectionKey::Int(2)]
    );
    assert_eq!(collection.get_by_key(0).unwrap().get("id"), Some(&json!(9)));
}

#[test]
fn foreign_item_type_is_rejected() {
    let other_schema = EntitySchema::new("order")
        .with_field(FieldSchema::scalar("id", ScalarType::Integer));
    let other_factory = EntityFactory::new(other_schema).unwrap();
    let raw = json!({"id": 1});
    let order = other_factory.build(raw.as_object().unwrap()).unwrap();

    let mut items = users(&[1, 2]);
    items.push(order);

    let err = KeyedCollection::create(items, "user", Some("id"), None).unwrap_err();
    match err {
        DataMapError::TypeMismatch { expected, found } => {
            assert_eq!(expected, "user");
            assert_eq!(found, "order");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn missing_id_field_is_configuration_error() {
    let err = KeyedCollection::create(users(&[1]), "user", Some("uid"), None).unwrap_err();
    assert!(matches!(err, DataMapError::Configuration(_)));
}

#[test]
fn uuid_ids_keyed_through_serializer() {
    let schema = EntitySchema::new("session")
        .with_field(FieldSchema::scalar("token", ScalarType::Uuid));
    let factory = EntityFactory::new(schema).unwrap();

    let raw = json!({"token": "67E5504410B1426F9247BB680E5FE0C8"});
    let session = factory.build(raw.as_object().unwrap()).unwrap();

    let collection =
        KeyedCollection::create([session], "session", Some("token"), Some("uuid_simple")).unwrap();
    assert!(collection
        .get_by_key("67e5504410b1426f9247bb680e5fe0c8")
        .is_some());
}

#[test]
fn unknown_serializer_fails_even_for_empty_input() {
    let err =
        KeyedCollection::create(Vec::new(), "user", Some("id"), Some("missing")).unwrap_err();
    assert!(matches!(err, DataMapError::Configuration(_)));
}

#[test]
fn custom_registry_serializer() {
    let mut registry = SerializerRegistry::with_builtins();
    registry.register("upper_name", |v: &Value| {
        v.as_str().map(str::to_uppercase)
    });

    let collection = KeyedCollection::create_with_registry(
        users(&[1]),
        "user",
        Some("name"),
        Some("upper_name"),
        &registry,
    )
    .unwrap();
    assert!(collection.get_by_key("USER-1").is_some());
}

#[test]
fn iteration_is_restartable_and_stable() {
    let collection = KeyedCollection::create(users(&[3, 1, 2]), "user", Some("id"), None).unwrap();

    let first: Vec<(&CollectionKey, &HydratedEntity)> = collection.iter().collect();
    let second: Vec<(&CollectionKey, &HydratedEntity)> = collection.iter().collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);

    // insertion order, not key order
    let ids: Vec<&Value> = collection.values().map(|u| u.get("id").unwrap()).collect();
    assert_eq!(ids, [&json!(3), &json!(1), &json!(2)]);

    let mut via_ref = Vec::new();
    for (key, _) in &collection {
        via_ref.push(key.clone());
    }
    assert_eq!(
        via_ref,
        [CollectionKey::Int(3), CollectionKey::Int(1), CollectionKey::Int(2)]
    );
}

#[test]
fn to_array_and_json_string() {
    let collection = KeyedCollection::create(users(&[1, 2]), "user", Some("id"), None).unwrap();

    let flat = collection.to_array();
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[0].get("id"), Some(&json!(1)));

    let encoded = collection.to_json_string();
    assert_eq!(
        encoded,
        r#"[{"id":1,"name":"user-1"},{"id":2,"name":"user-2"}]"#
    );
    assert_eq!(collection.to_string(), encoded);
}

#[test]
fn result_set_to_collection_end_to_end() {
    let rows: Vec<_> = [
        json!({"id": "1", "name": "Ann"}),
        json!({"id": "2", "name": "Bob"}),
    ]
    .iter()
    .map(|v| v.as_object().unwrap().clone())
    .collect();

    let factory = CollectionFactory::new(user_factory()).with_id_field("id");
    let collection = factory.from_rows(&rows).unwrap();

    // "1" was coerced to an integer id before key derivation
    assert_eq!(collection.get_by_key(1).unwrap().get("name"), Some(&json!("Ann")));
}
