use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A collection key: either a positional/derived integer or a derived
/// string. Keys are unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionKey {
    Int(i64),
    Str(String),
}

impl CollectionKey {
    /// Key from a raw id value, when the value is already a JSON integer or
    /// string. Anything else needs a registered id serializer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for CollectionKey {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

impl From<&str> for CollectionKey {
    fn from(key: &str) -> Self {
        Self::Str(key.to_string())
    }
}

impl From<String> for CollectionKey {
    fn from(key: String) -> Self {
        Self::Str(key)
    }
}
