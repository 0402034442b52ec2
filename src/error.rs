//! Error types for hydration, collection construction, and schema wiring
//!
//! The crate uses a single error enum so callers can match on the failure
//! class at the API boundary:
//! - `InputValidation` is recoverable and maps to a 400-class response
//! - `Configuration`, `DuplicateKey` and `TypeMismatch` indicate setup
//!   defects or broken invariants and should propagate as faults

use serde_json::Value;

/// Unified error type for the whole crate.
#[derive(Debug, thiserror::Error)]
pub enum DataMapError {
    /// Raw input failed validation against the entity schema.
    ///
    /// Recoverable and user-facing; carries the first offending field name.
    /// Validation is fail-fast — violations are never aggregated.
    #[error("field `{field}` {message}")]
    InputValidation { field: String, message: String },

    /// A registration-time wiring defect: missing sub-factory, unknown
    /// serializer, missing id field, unset schema. Never caused by input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Two collection items resolved to the same key.
    #[error("collection must have only one item with {field} = {value}; items must be unique when an id field is set")]
    DuplicateKey { field: String, value: String },

    /// A collection item does not belong to the declared item type.
    #[error("collection item has type [{found}], expected {expected}")]
    TypeMismatch { expected: String, found: String },

    /// JSON (de)serialization failure during typed entity conversion.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DataMapError {
    /// Missing required field, the most common validation failure.
    pub fn required(field: &str) -> Self {
        Self::InputValidation {
            field: field.to_string(),
            message: "is required".to_string(),
        }
    }

    /// Validation error with a custom message.
    pub fn validation<S: Into<String>>(field: &str, message: S) -> Self {
        Self::InputValidation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Configuration error with context.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Duplicate-key error for a collection id field.
    pub fn duplicate_key(field: &str, value: &Value) -> Self {
        Self::DuplicateKey {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type used throughout the crate.
pub type DataMapResult<T> = Result<T, DataMapError>;
