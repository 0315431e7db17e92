//! Validated objects: records whose writes pass through per-field validators
//!
//! A [`ValidatedObject`] owns a [`Record`] and a [`ValidatorMap`]. Reads go
//! straight to the record. Writes go through [`ValidatedObject::set`], which
//! runs the field's validator against the state as it stood before the
//! write and commits only on acceptance.
//!
//! A rejected write is silent: `set` returns normally and the field keeps its
//! previous value. Callers that need to know can re-read the field or use
//! [`ValidatedObject::try_set`].
//!
//! ```rust,ignore
//! use this_guard::prelude::*;
//!
//! let mut user = wrap(
//!     record! { "id" => "123", "name" => "jonathan" },
//!     ValidatorMap::new().with("name", validators::min_length(3)),
//! )?;
//!
//! user.set("name", "daniel");
//! user.set("name", "");          // rejected, no error
//! assert_eq!(user["name"], FieldValue::from("daniel"));
//! ```

use crate::core::error::{ConstructionError, GuardResult};
use crate::core::field::{FieldValue, Record, record_to_json};
use crate::core::validation::validator::{ValidatorMap, evaluate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// What happened to a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored
    Committed,
    /// The field's validator rejected the value (or failed); nothing changed
    Rejected,
    /// The record has no such field; nothing changed
    Undeclared,
}

impl WriteOutcome {
    pub fn is_committed(self) -> bool {
        matches!(self, WriteOutcome::Committed)
    }
}

/// A record whose property writes are validated before being committed
#[derive(Clone)]
pub struct ValidatedObject {
    state: Record,
    validators: ValidatorMap,
}

/// Wrap a record with a validator map.
///
/// Fails when the map guards a field the record does not declare. The
/// record's initial values are taken as-is; validators only run on writes.
pub fn wrap(record: Record, validators: ValidatorMap) -> GuardResult<ValidatedObject> {
    if let Some(field) = validators.fields().find(|f| !record.contains_key(*f)) {
        return Err(ConstructionError::UnknownField {
            field: field.to_string(),
        }
        .into());
    }

    tracing::trace!(
        fields = record.len(),
        guarded = validators.len(),
        "wrapping record"
    );

    Ok(ValidatedObject {
        state: record,
        validators,
    })
}

/// Wrap any value that is a structured object.
///
/// Plain objects are wrapped directly; an already validated object is
/// re-wrapped with the new validator map. Scalars, arrays and null fail
/// with [`ConstructionError::NotAnObject`].
pub fn wrap_value(
    value: impl Into<FieldValue>,
    validators: ValidatorMap,
) -> GuardResult<ValidatedObject> {
    match value.into() {
        FieldValue::Object(record) => wrap(record, validators),
        FieldValue::Validated(object) => wrap(object.into_record(), validators),
        other => Err(ConstructionError::NotAnObject {
            found: other.type_name(),
        }
        .into()),
    }
}

impl ValidatedObject {
    /// Wrap a JSON object
    pub fn from_json(value: serde_json::Value, validators: ValidatorMap) -> GuardResult<Self> {
        wrap_value(value, validators)
    }

    /// Read the current value of a field.
    ///
    /// Never invokes validators.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.state.get(key)
    }

    /// Write a field, silently discarding the value if it is rejected
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        let _ = self.try_set(key, value);
    }

    /// Write a field and report whether the value was committed.
    ///
    /// The field's validator, if any, is called exactly once with the
    /// candidate and the state before the write.
    pub fn try_set(&mut self, key: &str, value: impl Into<FieldValue>) -> WriteOutcome {
        let value = value.into();

        if !self.state.contains_key(key) {
            tracing::debug!(field = %key, "discarding write to undeclared field");
            return WriteOutcome::Undeclared;
        }

        if let Some(validator) = self.validators.get(key) {
            if !evaluate(key, validator.as_ref(), &value, &self.state) {
                tracing::debug!(field = %key, "write rejected");
                return WriteOutcome::Rejected;
            }
        }

        if let Some(slot) = self.state.get_mut(key) {
            *slot = value;
        }
        tracing::debug!(field = %key, "write committed");
        WriteOutcome::Committed
    }

    /// Mutable access to a nested validated object.
    ///
    /// Writes made through the returned handle run the nested object's own
    /// validators; the parent's validator for `key` guards only replacement
    /// of the whole value through [`set`](Self::set).
    pub fn object_mut(&mut self, key: &str) -> Option<&mut ValidatedObject> {
        self.state.get_mut(key).and_then(FieldValue::as_validated_mut)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Field names, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Read-only view of the current state
    pub fn record(&self) -> &Record {
        &self.state
    }

    pub fn validators(&self) -> &ValidatorMap {
        &self.validators
    }

    /// Unwrap into the current record, dropping the validators
    pub fn into_record(self) -> Record {
        self.state
    }

    pub fn to_json(&self) -> serde_json::Value {
        record_to_json(&self.state)
    }
}

impl Index<&str> for ValidatedObject {
    type Output = FieldValue;

    /// Panics if the field is not declared, like `HashMap` indexing
    fn index(&self, key: &str) -> &FieldValue {
        &self.state[key]
    }
}

impl PartialEq for ValidatedObject {
    /// Objects are equal when their current states are equal
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl fmt::Debug for ValidatedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedObject")
            .field("state", &self.state)
            .field("guarded", &self.validators.fields().collect::<Vec<_>>())
            .finish()
    }
}

impl Serialize for ValidatedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state.serialize(serializer)
    }
}
