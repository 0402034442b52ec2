use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DataMapResult;

/// An untyped field-name → value mapping, as decoded from a request body or
/// a database row. A key that is absent is distinct from a key present with
/// `Value::Null`.
pub type RawRow = Map<String, Value>;

/// A validated, hydrated entity produced by an
/// [`crate::hydration::EntityFactory`].
///
/// Fields are stored in the schema's declared order; force-optional fields
/// that were absent from input do not appear at all. The entity is immutable
/// after construction and owns its values.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedEntity {
    schema_name: String,
    fields: Map<String, Value>,
}

impl HydratedEntity {
    pub(crate) fn new(schema_name: String, fields: Map<String, Value>) -> Self {
        Self { schema_name, fields }
    }

    /// Name of the schema this entity was hydrated against.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Value of a field, or `None` when it is unset (force-optional absent).
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether a field was set during hydration.
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Flat representation of the entity, in declared field order.
    pub fn to_array(&self) -> Map<String, Value> {
        self.fields.clone()
    }

    /// Storage-facing representation: like [`Self::to_array`], but nested
    /// delegated entities are JSON-encoded to strings so the row stays flat.
    pub fn to_database_array(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let stored = match value {
                    Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
                    other => other.clone(),
                };
                (name.clone(), stored)
            })
            .collect()
    }

    /// The entity as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Convert the hydrated entity into a user-defined struct via serde.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> DataMapResult<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }
}
