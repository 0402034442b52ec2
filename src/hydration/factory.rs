use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::{Map, Value};

use crate::error::{DataMapError, DataMapResult};
use crate::hydration::coerce::coerce;
use crate::hydration::entity::{HydratedEntity, RawRow};
use crate::schema::entity::EntitySchema;
use crate::schema::field::{FieldKind, FieldSchema};

/// Builds [`HydratedEntity`] values from raw rows against one
/// [`EntitySchema`].
///
/// A factory is configured once through [`EntityFactoryBuilder`], then
/// invoked any number of times; it holds no per-invocation state and is safe
/// to share between threads. Delegated fields recurse into sub-factories
/// registered under the field's name, so one factory tree hydrates a whole
/// nested entity graph.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    schema: EntitySchema,
    force_optional: HashSet<String>,
    sub_factories: HashMap<String, EntityFactory>,
}

impl EntityFactory {
    /// Factory for a schema with no delegated fields and no force-optional
    /// overrides. Fails when the schema is invalid or declares a delegated
    /// field (which would need a sub-factory).
    pub fn new(schema: EntitySchema) -> DataMapResult<Self> {
        EntityFactoryBuilder::new(schema).finish()
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    /// Hydrate one raw row into an entity.
    ///
    /// Fields resolve independently, in declared order:
    /// 1. required and absent → [`DataMapError::InputValidation`]
    /// 2. nullable (not optional), present as null or the literal string
    ///    `"null"` → null (the two forms are deliberately equivalent; raw
    ///    input may arrive as decoded text)
    /// 3. optional and absent → declared default
    /// 4. force-optional and absent → left unset entirely
    /// 5. present → delegated sub-construction or scalar coercion
    ///
    /// Extra fields (outside the construction signature) are then copied
    /// verbatim when present and required when not force-optional.
    ///
    /// Construction is all-or-nothing: no partial entity escapes on failure.
    pub fn build(&self, raw: &RawRow) -> DataMapResult<HydratedEntity> {
        let mut fields = Map::new();

        for field in &self.schema.fields {
            if let Some(value) = self.resolve_field(field, raw)? {
                fields.insert(field.name.clone(), value);
            }
        }

        for extra in &self.schema.extra_fields {
            match raw.get(extra) {
                Some(value) => {
                    fields.insert(extra.clone(), value.clone());
                }
                None if self.is_force_optional_name(extra) => {}
                None => return Err(DataMapError::required(extra)),
            }
        }

        debug!(
            "Hydrated entity '{}' with {} fields",
            self.schema.name,
            fields.len()
        );

        Ok(HydratedEntity::new(self.schema.name.clone(), fields))
    }

    /// Resolve one declared field. `Ok(None)` means the field stays unset.
    fn resolve_field(&self, field: &FieldSchema, raw: &RawRow) -> DataMapResult<Option<Value>> {
        let force_optional = field.force_optional || self.force_optional.contains(&field.name);
        let present = raw.get(&field.name);

        if !force_optional && !field.optional && present.is_none() {
            return Err(DataMapError::required(&field.name));
        }

        if field.nullable && !field.optional {
            if let Some(value) = present {
                if is_null_signal(value) {
                    return Ok(Some(Value::Null));
                }
            }
        }

        let value = match present {
            None if field.optional => return Ok(field.default.clone()),
            None => return Ok(None), // force-optional, stays unset
            Some(value) => value,
        };

        match field.kind {
            FieldKind::Delegated => {
                let sub = self.sub_factories.get(&field.name).ok_or_else(|| {
                    DataMapError::configuration(format!(
                        "no sub-factory registered for delegated field '{}' of schema '{}'",
                        field.name, self.schema.name
                    ))
                })?;

                let nested = value.as_object().ok_or_else(|| {
                    DataMapError::validation(&field.name, "must be an object")
                })?;

                Ok(Some(sub.build(nested)?.to_value()))
            }
            FieldKind::Scalar(scalar) => Ok(Some(coerce(value, scalar))),
        }
    }

    fn is_force_optional_name(&self, name: &str) -> bool {
        self.force_optional.contains(name)
    }
}

/// Either `null` or the literal string `"null"`; text transports deliver
/// null as text.
fn is_null_signal(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str() == Some("null")
}

/// Declarative configuration for an [`EntityFactory`].
///
/// `finish` validates the schema and verifies the wiring: every delegated
/// field must have a sub-factory, and force-optional names must refer to
/// declared or extra fields. Wiring mistakes surface here, at registration
/// time, instead of on the first hydrated request.
pub struct EntityFactoryBuilder {
    schema: EntitySchema,
    force_optional: HashSet<String>,
    sub_factories: HashMap<String, EntityFactory>,
}

impl EntityFactoryBuilder {
    #[must_use]
    pub fn new(schema: EntitySchema) -> Self {
        Self {
            schema,
            force_optional: HashSet::new(),
            sub_factories: HashMap::new(),
        }
    }

    /// Allow a field to be silently absent even though the schema does not
    /// declare it optional.
    pub fn force_optional(mut self, field: &str) -> Self {
        self.force_optional.insert(field.to_string());
        self
    }

    /// Register the sub-factory that hydrates a delegated field.
    pub fn sub_factory(mut self, field: &str, factory: EntityFactory) -> Self {
        self.sub_factories.insert(field.to_string(), factory);
        self
    }

    pub fn finish(self) -> DataMapResult<EntityFactory> {
        self.schema.validate()?;

        for field in &self.schema.fields {
            if field.kind == FieldKind::Delegated && !self.sub_factories.contains_key(&field.name) {
                return Err(DataMapError::configuration(format!(
                    "delegated field '{}' of schema '{}' has no sub-factory",
                    field.name, self.schema.name
                )));
            }
        }

        for name in &self.force_optional {
            let declared = self.schema.field(name).is_some()
                || self.schema.extra_fields.iter().any(|f| f == name);
            if !declared {
                return Err(DataMapError::configuration(format!(
                    "force-optional field '{}' is not declared by schema '{}'",
                    name, self.schema.name
                )));
            }
        }

        debug!(
            "Entity factory for schema '{}' configured ({} sub-factories)",
            self.schema.name,
            self.sub_factories.len()
        );

        Ok(EntityFactory {
            schema: self.schema,
            force_optional: self.force_optional,
            sub_factories: self.sub_factories,
        })
    }
}
