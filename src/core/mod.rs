//! Core module containing the field model, validators and validated objects

pub mod entity;
pub mod error;
pub mod field;
pub mod proxy;
pub mod validation;

pub use entity::{CREATED_FIELD, Entity, EntityFactory, ID_FIELD, define_entity_factory};
pub use error::{ConfigError, ConstructionError, GuardError, GuardResult};
pub use field::{FieldFormat, FieldValue, Record, is_object};
pub use proxy::{ValidatedObject, WriteOutcome, wrap, wrap_value};
pub use validation::{Validator, ValidatorMap};
