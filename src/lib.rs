//! # This-Guard
//!
//! Validated entities for Rust: wrap a plain record with per-field
//! validators and every later write is checked before it is committed.
//!
//! ## Features
//!
//! - **Transparent Reads**: a wrapped record reads exactly like the original
//! - **Validated Writes**: each write runs the field's validator against the
//!   state before the write
//! - **Silent Rejection**: an invalid write leaves the old value in place and
//!   never returns an error
//! - **Fail-Closed**: a validator that panics or errors rejects the write
//! - **Entity Factories**: declare a schema once, build many entities with
//!   the `id` / `created` base shape
//! - **Declarative Schemas**: load field rules from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use this_guard::prelude::*;
//!
//! let create_user = define_entity_factory(validator_map! {
//!     id: [min_length(3)],
//!     name: [min_length(3)],
//! });
//!
//! let mut user = create_user.create(record! {
//!     "id" => "123",
//!     "created" => Utc::now(),
//!     "name" => "jonathan",
//! })?;
//!
//! user.set("name", "daniel");
//! user.set("name", "");      // rejected silently
//! assert_eq!(user["name"], FieldValue::from("daniel"));
//! ```
//!
//! Writes go through `set` rather than field assignment: Rust has no property
//! interception, so the accessor is the interception point.

pub mod config;
pub mod core;
pub mod entities;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{CREATED_FIELD, Entity, EntityFactory, ID_FIELD, define_entity_factory},
        error::{ConfigError, ConstructionError, GuardError, GuardResult},
        field::{FieldFormat, FieldValue, Record, is_object},
        proxy::{ValidatedObject, WriteOutcome, wrap, wrap_value},
        validation::{AllOf, Validator, ValidatorMap, validators},
    };

    // === Macros ===
    pub use crate::{record, validator_map};

    // === Config ===
    pub use crate::config::{RuleSpec, SchemaConfig, SchemasConfig};

    // === External dependencies ===
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
