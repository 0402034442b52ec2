//! Storage boundary
//!
//! The relational adapter itself (SQL generation, connections, drivers) is
//! out of scope; this module only fixes the contracts the core meets it at:
//! a source of raw rows, a store interface expressed over rows, entities and
//! collections, and the factory that turns a result set into a collection.

use serde_json::Value;

use crate::collection::KeyedCollection;
use crate::error::{DataMapError, DataMapResult};
use crate::hydration::{EntityFactory, HydratedEntity, RawRow};

/// Anything that can produce a finite sequence of raw rows: a query result,
/// a decoded request body, a fixture file.
pub trait RowSource {
    fn rows(&self) -> DataMapResult<Vec<RawRow>>;
}

impl RowSource for Vec<RawRow> {
    fn rows(&self) -> DataMapResult<Vec<RawRow>> {
        Ok(self.clone())
    }
}

/// Low-level store contract over one table/keyspace of entities.
///
/// Implementations issue the actual create/find/update/delete calls against
/// a driver and use an [`EntityFactory`] (usually via [`CollectionFactory`])
/// to turn fetched rows into entities. No implementation ships with this
/// crate.
pub trait EntityStore {
    /// Insert one row; returns the number of affected rows when the driver
    /// reports one.
    fn create(&self, row: &RawRow) -> DataMapResult<Option<u64>>;

    /// Insert an entity through its storage representation.
    fn create_from_entity(&self, entity: &HydratedEntity) -> DataMapResult<Option<u64>> {
        self.create(&entity.to_database_array())
    }

    fn find_one(&self, id: &Value) -> DataMapResult<Option<HydratedEntity>>;

    fn find_one_by_criteria(&self, criteria: &RawRow) -> DataMapResult<Option<HydratedEntity>>;

    fn find(&self, ids: &[Value]) -> DataMapResult<KeyedCollection>;

    fn find_by_criteria(&self, criteria: &RawRow) -> DataMapResult<KeyedCollection>;

    /// Returns the number of affected rows.
    fn update(&self, id: &Value, data: &RawRow) -> DataMapResult<u64>;

    fn update_by(&self, criteria: &RawRow, data: &RawRow) -> DataMapResult<u64>;

    /// Returns the number of affected rows when the driver reports one.
    fn delete(&self, id: &Value) -> DataMapResult<Option<u64>>;
}

/// Hydrates whole result sets: every row goes through the entity factory and
/// the entities are indexed into a [`KeyedCollection`].
#[derive(Debug, Clone)]
pub struct CollectionFactory {
    factory: EntityFactory,
    id_field: Option<String>,
    id_serializer: Option<String>,
}

impl CollectionFactory {
    /// Positional collections: rows keep their input order as keys.
    #[must_use]
    pub fn new(factory: EntityFactory) -> Self {
        Self {
            factory,
            id_field: None,
            id_serializer: None,
        }
    }

    /// Key the built collections by the given id field.
    pub fn with_id_field(mut self, id_field: &str) -> Self {
        self.id_field = Some(id_field.to_string());
        self
    }

    /// Pass derived id values through the named serializer.
    pub fn with_id_serializer(mut self, id_serializer: &str) -> Self {
        self.id_serializer = Some(id_serializer.to_string());
        self
    }

    pub fn entity_factory(&self) -> &EntityFactory {
        &self.factory
    }

    /// Hydrate every row, preserving input order. Fails on the first
    /// invalid row; no partial result escapes.
    pub fn hydrate_rows<S: RowSource>(&self, source: &S) -> DataMapResult<Vec<HydratedEntity>> {
        source.rows()?.iter().map(|row| self.factory.build(row)).collect()
    }

    /// Hydrate every row and index the entities into a collection.
    pub fn from_rows<S: RowSource>(&self, source: &S) -> DataMapResult<KeyedCollection> {
        let items = self.hydrate_rows(source)?;
        KeyedCollection::create(
            items,
            &self.factory.schema().name,
            self.id_field.as_deref(),
            self.id_serializer.as_deref(),
        )
    }
}

/// Serialize a raw row into a JSON string parameter for embedding in a
/// driver call.
pub fn row_to_json_param(row: &RawRow) -> DataMapResult<String> {
    serde_json::to_string(row).map_err(DataMapError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntitySchema, FieldSchema, ScalarType};
    use serde_json::json;

    fn rows(values: Value) -> Vec<RawRow> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn user_factory() -> EntityFactory {
        let schema = EntitySchema::new("user")
            .with_field(FieldSchema::scalar("id", ScalarType::Integer))
            .with_field(FieldSchema::scalar("name", ScalarType::String));
        EntityFactory::new(schema).unwrap()
    }

    #[test]
    fn test_from_rows_builds_keyed_collection() {
        let factory = CollectionFactory::new(user_factory()).with_id_field("id");
        let source = rows(json!([
            {"id": 1, "name": "Ann"},
            {"id": 2, "name": "Bob"}
        ]));

        let collection = factory.from_rows(&source).unwrap();
        assert_eq!(collection.count(), 2);
        assert_eq!(
            collection.get_by_key(2).unwrap().get("name"),
            Some(&json!("Bob"))
        );
    }

    #[test]
    fn test_from_rows_positional_by_default() {
        let factory = CollectionFactory::new(user_factory());
        let source = rows(json!([
            {"id": 9, "name": "Ann"},
            {"id": 7, "name": "Bob"}
        ]));

        let collection = factory.from_rows(&source).unwrap();
        assert_eq!(collection.get_by_key(0).unwrap().get("id"), Some(&json!(9)));
        assert_eq!(collection.get_by_key(1).unwrap().get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_invalid_row_fails_whole_result_set() {
        let factory = CollectionFactory::new(user_factory()).with_id_field("id");
        let source = rows(json!([
            {"id": 1, "name": "Ann"},
            {"id": 2}
        ]));

        let err = factory.from_rows(&source).unwrap_err();
        assert_eq!(err.to_string(), "field `name` is required");
    }

    #[test]
    fn test_row_to_json_param() {
        let row = rows(json!([{"id": 1, "name": "Ann"}])).remove(0);
        assert_eq!(row_to_json_param(&row).unwrap(), r#"{"id":1,"name":"Ann"}"#);
    }
}
