//! Named id serializers
//!
//! Some id fields hold rich values (uuids, composite values) that need a
//! canonical string form before they can act as collection keys.
//! Serializers are plain functions registered by name, so a missing
//! serializer is detectable without invoking anything.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;
use uuid::Uuid;

/// Turns a raw id value into its canonical string key. `None` means the
/// serializer cannot handle the value's shape.
pub type IdSerializer = fn(&Value) -> Option<String>;

/// Registry of named id serializers.
#[derive(Debug, Clone, Default)]
pub struct SerializerRegistry {
    serializers: HashMap<String, IdSerializer>,
}

impl SerializerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in serializers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("to_string", scalar_to_string);
        registry.register("uuid_hyphenated", uuid_hyphenated);
        registry.register("uuid_simple", uuid_simple);
        registry
    }

    pub fn register(&mut self, name: &str, serializer: IdSerializer) {
        self.serializers.insert(name.to_string(), serializer);
    }

    pub fn get(&self, name: &str) -> Option<IdSerializer> {
        self.serializers.get(name).copied()
    }
}

/// Shared registry holding only the built-ins.
pub fn default_registry() -> &'static SerializerRegistry {
    static REGISTRY: Lazy<SerializerRegistry> = Lazy::new(SerializerRegistry::with_builtins);
    &REGISTRY
}

/// Display form of any scalar id value.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn uuid_hyphenated(value: &Value) -> Option<String> {
    parse_uuid(value).map(|u| u.hyphenated().to_string())
}

fn uuid_simple(value: &Value) -> Option<String> {
    parse_uuid(value).map(|u| u.simple().to_string())
}

fn parse_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok())
}
