use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kinds a scalar field can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Boolean,
    Integer,
    Float,
    String,
    Uuid,
    DateTime,
}

/// How a field's raw value becomes its hydrated value.
///
/// `Scalar` fields go through permissive coercion; `Delegated` fields are
/// handed to a sub-factory registered under the field's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar(ScalarType),
    Delegated,
}

/// Static description of one constructor/field slot of an entity type.
///
/// Pure data, no behavior. The flags are independent:
/// - `optional` — may be absent from input, in which case `default` is used
/// - `nullable` — `null` (or the literal string `"null"`) hydrates to null
/// - `force_optional` — may be silently absent even when not declared
///   optional; the field is then left unset entirely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub force_optional: bool,
}

impl FieldSchema {
    /// Create a required scalar field with no default.
    #[must_use]
    pub fn scalar(name: &str, scalar: ScalarType) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Scalar(scalar),
            optional: false,
            nullable: false,
            default: None,
            force_optional: false,
        }
    }

    /// Create a required delegated field; a sub-factory must be registered
    /// under the same name on the owning factory.
    #[must_use]
    pub fn delegated(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Delegated,
            optional: false,
            nullable: false,
            default: None,
            force_optional: false,
        }
    }

    /// Mark the field optional with the given default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.optional = true;
        self.default = Some(default);
        self
    }

    pub fn with_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_force_optional(mut self) -> Self {
        self.force_optional = true;
        self
    }

    /// A field is required when it is neither optional nor force-optional.
    pub fn is_required(&self) -> bool {
        !self.optional && !self.force_optional
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
