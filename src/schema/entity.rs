use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{DataMapError, DataMapResult};
use crate::schema::field::FieldSchema;

/// Static schema of one entity type: its name, its constructor-level fields
/// in declared order, and any supplementary fields copied verbatim from input
/// (metadata not part of the primary construction signature).
///
/// A schema is declared once, validated at registration time, and shared by
/// every [`crate::hydration::EntityFactory`] built from it. Declaring the
/// shape statically means wiring mistakes surface when the schema is
/// registered, not on the first request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    #[serde(default)]
    pub extra_fields: Vec<String>,
}

impl EntitySchema {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            extra_fields: Vec::new(),
        }
    }

    /// Append a constructor-level field. Declared order is hydration order.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a supplementary field copied verbatim from input.
    pub fn with_extra_field(mut self, name: &str) -> Self {
        self.extra_fields.push(name.to_string());
        self
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate the schema at registration time.
    ///
    /// Checks: non-empty schema name, at least one field, non-empty unique
    /// field names, optional fields carry a default, extra fields do not
    /// collide with declared fields.
    pub fn validate(&self) -> DataMapResult<()> {
        if self.name.is_empty() {
            return Err(DataMapError::configuration("schema name cannot be empty"));
        }

        if self.fields.is_empty() && self.extra_fields.is_empty() {
            return Err(DataMapError::configuration(format!(
                "schema '{}' must declare at least one field",
                self.name
            )));
        }

        let mut seen: HashSet<&str> = HashSet::new();

        for field in &self.fields {
            if field.name.is_empty() {
                return Err(DataMapError::configuration(format!(
                    "schema '{}' has a field with an empty name",
                    self.name
                )));
            }

            if !seen.insert(field.name.as_str()) {
                return Err(DataMapError::configuration(format!(
                    "schema '{}' declares field '{}' more than once",
                    self.name, field.name
                )));
            }

            if field.optional && !field.has_default() {
                return Err(DataMapError::configuration(format!(
                    "optional field '{}' of schema '{}' has no default value",
                    field.name, self.name
                )));
            }
        }

        for extra in &self.extra_fields {
            if extra.is_empty() {
                return Err(DataMapError::configuration(format!(
                    "schema '{}' has an extra field with an empty name",
                    self.name
                )));
            }

            if !seen.insert(extra.as_str()) {
                return Err(DataMapError::configuration(format!(
                    "extra field '{}' of schema '{}' collides with another field",
                    extra, self.name
                )));
            }
        }

        info!(
            "Schema '{}' validated with {} fields",
            self.name,
            self.fields.len() + self.extra_fields.len()
        );

        Ok(())
    }
}
