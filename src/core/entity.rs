//! Entity shape and reusable entity factories
//!
//! Every entity carries:
//! - `id`: a string or UUID identifier
//! - `created`: the creation timestamp
//!
//! An [`EntityFactory`] closes over a validator map once and wraps any number
//! of initial records with it. The factory always guards `created` with a
//! timestamp type check; `id` is guarded only by what the schema supplies.

use crate::core::error::{ConstructionError, GuardResult};
use crate::core::field::{FieldValue, Record};
use crate::core::proxy::{ValidatedObject, wrap, wrap_value};
use crate::core::validation::validator::ValidatorMap;
use crate::core::validation::validators;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Name of the identifier field
pub const ID_FIELD: &str = "id";

/// Name of the creation timestamp field
pub const CREATED_FIELD: &str = "created";

/// Accessors for the base entity fields
pub trait Entity {
    /// Get the identifier value (a string or UUID)
    fn id(&self) -> Option<&FieldValue>;

    /// Get the creation timestamp
    fn created(&self) -> Option<DateTime<Utc>>;

    /// Get the identifier rendered as a string
    fn id_string(&self) -> Option<String> {
        match self.id()? {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Uuid(u) => Some(u.to_string()),
            _ => None,
        }
    }
}

impl Entity for ValidatedObject {
    fn id(&self) -> Option<&FieldValue> {
        self.get(ID_FIELD)
    }

    fn created(&self) -> Option<DateTime<Utc>> {
        self.get(CREATED_FIELD).and_then(FieldValue::as_datetime)
    }
}

/// A reusable constructor for validated entities sharing one schema
#[derive(Debug, Clone)]
pub struct EntityFactory {
    schema: ValidatorMap,
}

/// Close over `schema` and return a factory for entities that use it
pub fn define_entity_factory(schema: ValidatorMap) -> EntityFactory {
    EntityFactory::new(schema)
}

impl EntityFactory {
    /// Build a factory, adding the `created` timestamp check to `schema`
    pub fn new(mut schema: ValidatorMap) -> Self {
        schema.add_shared(CREATED_FIELD, Arc::new(validators::is_datetime()));
        Self { schema }
    }

    /// The validator map every created entity is wrapped with
    pub fn schema(&self) -> &ValidatorMap {
        &self.schema
    }

    /// Wrap a fresh initial record.
    ///
    /// `id` must be a string or UUID and `created` a timestamp; every field
    /// the schema guards must be present. Initial values are not run through
    /// the validators.
    pub fn create(&self, initial: Record) -> GuardResult<ValidatedObject> {
        check_base_fields(&initial)?;

        if let Some(field) = self.schema.fields().find(|f| !initial.contains_key(*f)) {
            return Err(ConstructionError::MissingField {
                field: field.to_string(),
            }
            .into());
        }

        wrap(initial, self.schema.clone())
    }

    /// Wrap a JSON object.
    ///
    /// JSON has no timestamp type, so a string `created` is parsed as
    /// RFC 3339.
    pub fn create_from_json(&self, value: serde_json::Value) -> GuardResult<ValidatedObject> {
        let mut record = wrap_value(value, ValidatorMap::new())?.into_record();

        if let Some(slot) = record.get_mut(CREATED_FIELD) {
            if let Some(parsed) = slot
                .as_string()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            {
                *slot = FieldValue::DateTime(parsed.with_timezone(&Utc));
            }
        }

        self.create(record)
    }
}

fn check_base_fields(record: &Record) -> Result<(), ConstructionError> {
    match record.get(ID_FIELD) {
        None => {
            return Err(ConstructionError::MissingField {
                field: ID_FIELD.to_string(),
            });
        }
        Some(FieldValue::String(_) | FieldValue::Uuid(_)) => {}
        Some(other) => {
            return Err(ConstructionError::InvalidField {
                field: ID_FIELD.to_string(),
                expected: "string or uuid",
                found: other.type_name(),
            });
        }
    }

    match record.get(CREATED_FIELD) {
        None => Err(ConstructionError::MissingField {
            field: CREATED_FIELD.to_string(),
        }),
        Some(FieldValue::DateTime(_)) => Ok(()),
        Some(other) => Err(ConstructionError::InvalidField {
            field: CREATED_FIELD.to_string(),
            expected: "datetime",
            found: other.type_name(),
        }),
    }
}
