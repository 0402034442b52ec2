//! Entity hydration
//!
//! Turns a flat raw row into a validated, typed entity by walking the target
//! schema's declared fields:
//! - Conditional required/optional/nullable resolution per field
//! - Delegated sub-construction for nested object fields
//! - Permissive scalar coercion for primitive fields

pub mod coerce;
pub mod entity;
pub mod factory;

pub use coerce::coerce;
pub use entity::{HydratedEntity, RawRow};
pub use factory::{EntityFactory, EntityFactoryBuilder};
