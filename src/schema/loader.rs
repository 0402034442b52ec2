//! Loading schema definitions from JSON
//!
//! Schemas are plain serde structures, so a definition can live in a JSON
//! file next to the application's configuration and be registered at startup.
//! Every loaded schema is validated before it is returned.

use std::fs;
use std::path::Path;

use crate::error::{DataMapError, DataMapResult};
use crate::schema::entity::EntitySchema;

/// Parse and validate a schema definition from a JSON string.
pub fn schema_from_str(definition: &str) -> DataMapResult<EntitySchema> {
    let schema: EntitySchema = serde_json::from_str(definition)
        .map_err(|e| DataMapError::configuration(format!("invalid schema definition: {e}")))?;
    schema.validate()?;
    Ok(schema)
}

/// Read, parse and validate a schema definition from a JSON file.
pub fn schema_from_file<P: AsRef<Path>>(path: P) -> DataMapResult<EntitySchema> {
    let definition = fs::read_to_string(&path).map_err(|e| {
        DataMapError::configuration(format!(
            "cannot read schema file {}: {e}",
            path.as_ref().display()
        ))
    })?;
    schema_from_str(&definition)
}
