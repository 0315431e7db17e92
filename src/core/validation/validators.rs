//! Reusable field validators
//!
//! Rule constructors used by the `validator_map!` macro and declarative
//! schemas. Every rule is a plain closure, so it can be passed straight to
//! [`ValidatorMap::insert`](super::ValidatorMap::insert) or
//! [`ValidatorMap::add`](super::ValidatorMap::add).
//!
//! Type-specific rules reject values of the wrong type: `string_length`
//! rejects an integer rather than letting it through.

use super::validator::{AllOf, Validator};
use crate::core::field::{FieldFormat, FieldValue, Record};
use std::sync::Arc;

/// Validator: value is not null
pub fn required() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |value: &FieldValue, _: &Record| !value.is_null()
}

/// Validator: always valid
pub fn optional() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |_: &FieldValue, _: &Record| true
}

/// Validator: never valid, the field keeps its construction value
pub fn reject_all() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |_: &FieldValue, _: &Record| false
}

/// Validator: number must be strictly positive
pub fn positive() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |value: &FieldValue, _: &Record| value.as_float().is_some_and(|num| num > 0.0)
}

/// Validator: number must not exceed maximum
pub fn max_value(max: f64) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    move |value: &FieldValue, _: &Record| value.as_float().is_some_and(|num| num <= max)
}

/// Validator: string length (in characters) must be within `min..=max`
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    move |value: &FieldValue, _: &Record| {
        value
            .as_string()
            .is_some_and(|s| (min..=max).contains(&s.chars().count()))
    }
}

/// Validator: string must have at least `min` characters
pub fn min_length(min: usize) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    move |value: &FieldValue, _: &Record| value.as_string().is_some_and(|s| s.chars().count() >= min)
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    move |value: &FieldValue, _: &Record| {
        value
            .as_string()
            .is_some_and(|s| allowed.iter().any(|a| a == s))
    }
}

/// Validator: string must parse as a date in the given `chrono` format
pub fn date_format(
    format: impl Into<String>,
) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    let format = format.into();
    move |value: &FieldValue, _: &Record| {
        value
            .as_string()
            .is_some_and(|s| chrono::NaiveDate::parse_from_str(s, &format).is_ok())
    }
}

/// Validator: value must match a [`FieldFormat`]
pub fn format(format: FieldFormat) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    move |value: &FieldValue, _: &Record| format.validate(value)
}

/// Validator: value must be a point in time
pub fn is_datetime() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |value: &FieldValue, _: &Record| matches!(value, FieldValue::DateTime(_))
}

/// Validator: value must be a structured object (plain or validated)
pub fn object() -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    |value: &FieldValue, _: &Record| value.is_object()
}

/// Validator: reject writes that would not change the field's current value
///
/// Values compare with [`FieldValue::same_as`], so rewriting a NaN is
/// rejected like any other identical write.
pub fn changed(field: impl Into<String>) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    let field = field.into();
    move |value: &FieldValue, state: &Record| {
        !state.get(&field).is_some_and(|current| current.same_as(value))
    }
}

/// Validator: accept only a write of the field's current value
pub fn immutable(
    field: impl Into<String>,
) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone {
    let field = field.into();
    move |value: &FieldValue, state: &Record| {
        state.get(&field).is_some_and(|current| current.same_as(value))
    }
}

/// Validator: every member must accept
pub fn all_of(validators: Vec<Arc<dyn Validator>>) -> AllOf {
    AllOf::new(validators)
}

/// Validator: adapt a fallible check.
///
/// An `Err` is logged and treated as a rejection.
pub fn fallible<F>(check: F) -> impl Fn(&FieldValue, &Record) -> bool + Send + Sync + Clone
where
    F: Fn(&FieldValue, &Record) -> anyhow::Result<bool> + Send + Sync + Clone,
{
    move |value: &FieldValue, state: &Record| match check(value, state) {
        Ok(accepted) => accepted,
        Err(err) => {
            tracing::warn!(error = %err, "validator failed, rejecting write");
            false
        }
    }
}
