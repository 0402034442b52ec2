//! Static entity schemas
//!
//! This module contains the declarative description of entity types:
//! - Field slots with required/optional/nullable resolution flags
//! - Entity schemas with declared field order and registration-time validation
//! - A loader for JSON schema definitions

pub mod entity;
pub mod field;
pub mod loader;

pub use entity::EntitySchema;
pub use field::{FieldKind, FieldSchema, ScalarType};
pub use loader::{schema_from_file, schema_from_str};
