//! Keyed, immutable entity collections
//!
//! A collection groups hydrated entities of one type under unique keys:
//! - Positional collections (no id field) key by input order, `0..n-1`
//! - Keyed collections derive the key from an id field, optionally through a
//!   named serializer for rich id values
//! - Duplicate keys and foreign item types fail construction outright
//!
//! Collections are built once and immutable thereafter, so traversal is
//! restartable: every call to [`KeyedCollection::iter`] starts a fresh pass
//! over the same insertion order.

pub mod key;
pub mod serializer;

pub use key::CollectionKey;
pub use serializer::{default_registry, IdSerializer, SerializerRegistry};

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde_json::{json, Map, Value};

use crate::error::{DataMapError, DataMapResult};
use crate::hydration::HydratedEntity;

/// An ordered, uniquely-keyed, immutable collection of hydrated entities.
#[derive(Debug, Clone)]
pub struct KeyedCollection {
    item_type: String,
    entries: Vec<(CollectionKey, HydratedEntity)>,
    index: HashMap<CollectionKey, usize>,
}

impl KeyedCollection {
    /// Build a collection, deriving keys with the built-in serializers.
    ///
    /// With `id_field: None` the collection is positional and keys are
    /// exactly `0..n-1` in input order. With an id field, every item must
    /// carry that field and the derived keys must be unique.
    pub fn create<I>(
        items: I,
        item_type: &str,
        id_field: Option<&str>,
        id_serializer: Option<&str>,
    ) -> DataMapResult<Self>
    where
        I: IntoIterator<Item = HydratedEntity>,
    {
        Self::create_with_registry(items, item_type, id_field, id_serializer, default_registry())
    }

    /// Build a collection resolving serializer names in the given registry.
    pub fn create_with_registry<I>(
        items: I,
        item_type: &str,
        id_field: Option<&str>,
        id_serializer: Option<&str>,
        registry: &SerializerRegistry,
    ) -> DataMapResult<Self>
    where
        I: IntoIterator<Item = HydratedEntity>,
    {
        // resolve the serializer up front so a bad name fails even for
        // an empty input sequence
        let serializer = match id_serializer {
            Some(name) => Some(registry.get(name).ok_or_else(|| {
                DataMapError::configuration(format!("unknown id serializer '{name}'"))
            })?),
            None => None,
        };

        let mut collection = Self {
            item_type: item_type.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for item in items {
            if item.schema_name() != item_type {
                return Err(DataMapError::TypeMismatch {
                    expected: item_type.to_string(),
                    found: item.schema_name().to_string(),
                });
            }

            let key = match id_field {
                None => CollectionKey::Int(collection.entries.len() as i64),
                Some(field) => derive_key(&item, field, serializer)?,
            };

            if collection.index.contains_key(&key) {
                // id_field is always set here: positional keys cannot collide
                let field = id_field.unwrap_or_default();
                let value = item.get(field).cloned().unwrap_or(Value::Null);
                return Err(DataMapError::duplicate_key(field, &value));
            }

            collection.index.insert(key.clone(), collection.entries.len());
            collection.entries.push((key, item));
        }

        debug!(
            "Built collection of {} '{}' items (id field: {})",
            collection.entries.len(),
            item_type,
            id_field.unwrap_or("positional")
        );

        Ok(collection)
    }

    /// Item type every member of this collection belongs to.
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// O(1) lookup by key. Absence is expected, not an error.
    pub fn get_by_key<K: Into<CollectionKey>>(&self, key: K) -> Option<&HydratedEntity> {
        self.index.get(&key.into()).map(|&i| &self.entries[i].1)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &CollectionKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Fresh `(key, item)` iterator over insertion order; the collection is
    /// immutable, so repeated traversals always yield the same sequence.
    pub fn iter(&self) -> impl Iterator<Item = (&CollectionKey, &HydratedEntity)> {
        self.entries.iter().map(|(key, item)| (key, item))
    }

    /// Items in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &HydratedEntity> {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Ordered sequence of each item's flat representation.
    pub fn to_array(&self) -> Vec<Map<String, Value>> {
        self.values().map(HydratedEntity::to_array).collect()
    }

    /// JSON encoding of [`Self::to_array`]. Encoding failures are converted
    /// into a structured error envelope instead of propagating.
    pub fn to_json_string(&self) -> String {
        match serde_json::to_string(&self.to_array()) {
            Ok(encoded) => encoded,
            Err(e) => json!({"status": "error", "message": e.to_string()}).to_string(),
        }
    }
}

impl fmt::Display for KeyedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json_string())
    }
}

impl<'a> IntoIterator for &'a KeyedCollection {
    type Item = (&'a CollectionKey, &'a HydratedEntity);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (CollectionKey, HydratedEntity)>,
        fn(&'a (CollectionKey, HydratedEntity)) -> (&'a CollectionKey, &'a HydratedEntity),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let split: fn(&'a (CollectionKey, HydratedEntity)) -> (&'a CollectionKey, &'a HydratedEntity) =
            |(key, item)| (key, item);
        self.entries.iter().map(split)
    }
}

/// Derive an item's key from its id field, optionally through a serializer.
fn derive_key(
    item: &HydratedEntity,
    id_field: &str,
    serializer: Option<IdSerializer>,
) -> DataMapResult<CollectionKey> {
    let raw = item.get(id_field).ok_or_else(|| {
        DataMapError::configuration(format!(
            "'{id_field}' is not a field of collection items of type '{}'",
            item.schema_name()
        ))
    })?;

    match serializer {
        Some(serialize) => serialize(raw).map(CollectionKey::Str).ok_or_else(|| {
            DataMapError::configuration(format!(
                "id serializer cannot handle value {raw} of field '{id_field}'"
            ))
        }),
        None => CollectionKey::from_value(raw).ok_or_else(|| {
            DataMapError::configuration(format!(
                "id field '{id_field}' value {raw} is not an integer or string; register an id serializer"
            ))
        }),
    }
}
