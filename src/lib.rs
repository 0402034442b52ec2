//! # datamap
//!
//! A data-mapping toolkit: converts untyped key/value input (request bodies,
//! database rows) into validated, typed entities, and organizes entities
//! into uniquely-keyed, immutable collections.
//!
//! The two central pieces:
//! - [`hydration::EntityFactory`] — hydrates a raw row against a statically
//!   declared [`schema::EntitySchema`], with conditional
//!   required/optional/nullable resolution, delegated sub-construction for
//!   nested fields, and permissive scalar coercion
//! - [`collection::KeyedCollection`] — indexes hydrated entities under
//!   unique derived keys with O(1) lookup and stable insertion order
//!
//! Everything is synchronous and immutable after construction; factories,
//! schemas and collections can be shared freely across threads.
//!
//! ```
//! use datamap::schema::{EntitySchema, FieldSchema, ScalarType};
//! use datamap::hydration::EntityFactory;
//! use datamap::collection::KeyedCollection;
//!
//! let schema = EntitySchema::new("user")
//!     .with_field(FieldSchema::scalar("id", ScalarType::Integer))
//!     .with_field(FieldSchema::scalar("name", ScalarType::String))
//!     .with_field(FieldSchema::scalar("email", ScalarType::String).with_nullable());
//!
//! let factory = EntityFactory::new(schema).unwrap();
//!
//! let raw = serde_json::json!({"id": "5", "name": "Bob", "email": "null"});
//! let user = factory.build(raw.as_object().unwrap()).unwrap();
//! assert_eq!(user.get("id"), Some(&serde_json::json!(5)));
//! assert_eq!(user.get("email"), Some(&serde_json::Value::Null));
//!
//! let users = KeyedCollection::create([user], "user", Some("id"), None).unwrap();
//! assert!(users.get_by_key(5).is_some());
//! ```

pub mod collection;
pub mod error;
pub mod hydration;
pub mod schema;
pub mod storage;

pub use collection::{CollectionKey, KeyedCollection, SerializerRegistry};
pub use error::{DataMapError, DataMapResult};
pub use hydration::{EntityFactory, EntityFactoryBuilder, HydratedEntity, RawRow};
pub use schema::{EntitySchema, FieldKind, FieldSchema, ScalarType};
pub use storage::{CollectionFactory, EntityStore, RowSource};
