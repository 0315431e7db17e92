//! The validator capability and the per-field validator map

use crate::core::field::{FieldValue, Record};
use indexmap::IndexMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A predicate deciding whether a single-field write is committed.
///
/// `candidate` is the value being written; `state` is the record exactly as
/// it stood before the write. Implementations must be side-effect free.
///
/// Any `Fn(&FieldValue, &Record) -> bool + Send + Sync` closure is a
/// validator.
pub trait Validator: Send + Sync {
    fn validate(&self, candidate: &FieldValue, state: &Record) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&FieldValue, &Record) -> bool + Send + Sync,
{
    fn validate(&self, candidate: &FieldValue, state: &Record) -> bool {
        self(candidate, state)
    }
}

/// Conjunction of validators; accepts only when every member accepts.
///
/// Members are evaluated in order and evaluation stops at the first
/// rejection.
#[derive(Clone, Default)]
pub struct AllOf(Vec<Arc<dyn Validator>>);

impl AllOf {
    pub fn new(validators: Vec<Arc<dyn Validator>>) -> Self {
        Self(validators)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Validator for AllOf {
    fn validate(&self, candidate: &FieldValue, state: &Record) -> bool {
        self.0.iter().all(|v| v.validate(candidate, state))
    }
}

/// Mapping from field name to the validator guarding it.
///
/// A field has at most one validator; fields without an entry accept every
/// write. The map is cheap to clone: validators are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct ValidatorMap {
    entries: IndexMap<String, Arc<dyn Validator>>,
}

impl ValidatorMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with<F>(mut self, field: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&FieldValue, &Record) -> bool + Send + Sync + 'static,
    {
        self.insert(field, validator);
        self
    }

    /// Set the validator for a field, replacing any existing one
    pub fn insert<F>(&mut self, field: impl Into<String>, validator: F)
    where
        F: Fn(&FieldValue, &Record) -> bool + Send + Sync + 'static,
    {
        self.insert_validator(field, validator);
    }

    /// Set a validator of any `Validator` type, replacing any existing one
    pub fn insert_validator<V>(&mut self, field: impl Into<String>, validator: V)
    where
        V: Validator + 'static,
    {
        self.entries.insert(field.into(), Arc::new(validator));
    }

    /// Add a validator to a field.
    ///
    /// If the field is already guarded, the two validators are combined and
    /// both must accept.
    pub fn add<F>(&mut self, field: impl Into<String>, validator: F)
    where
        F: Fn(&FieldValue, &Record) -> bool + Send + Sync + 'static,
    {
        self.add_shared(field, Arc::new(validator));
    }

    pub(crate) fn add_shared(&mut self, field: impl Into<String>, validator: Arc<dyn Validator>) {
        let field = field.into();
        match self.entries.get_mut(&field) {
            Some(existing) => {
                let previous = Arc::clone(existing);
                *existing = Arc::new(AllOf::new(vec![previous, validator]));
            }
            None => {
                self.entries.insert(field, validator);
            }
        }
    }

    /// Get the validator guarding a field
    pub fn get(&self, field: &str) -> Option<&Arc<dyn Validator>> {
        self.entries.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Names of the guarded fields, in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ValidatorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMap")
            .field("fields", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Run a validator once, failing closed.
///
/// A panicking validator counts as a rejection; the panic does not reach
/// the caller. Requires the default `panic = "unwind"` strategy. The panic
/// hook still runs first, so the default hook prints the panic message to
/// stderr even though the write is rejected silently.
pub(crate) fn evaluate(
    field: &str,
    validator: &dyn Validator,
    candidate: &FieldValue,
    state: &Record,
) -> bool {
    match catch_unwind(AssertUnwindSafe(|| validator.validate(candidate, state))) {
        Ok(accepted) => accepted,
        Err(_) => {
            tracing::warn!(field = %field, "validator panicked, rejecting write");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_state() -> Record {
        Record::new()
    }

    #[test]
    fn test_closure_is_validator() {
        let v = |candidate: &FieldValue, _: &Record| candidate.as_integer() == Some(1);
        assert!(v.validate(&FieldValue::Integer(1), &empty_state()));
        assert!(!v.validate(&FieldValue::Integer(2), &empty_state()));
    }

    #[test]
    fn test_insert_replaces_existing_validator() {
        let map = ValidatorMap::new()
            .with("name", |_, _| false)
            .with("name", |_, _| true);

        assert_eq!(map.len(), 1);
        let v = map.get("name").expect("validator should exist");
        assert!(v.validate(&FieldValue::Null, &empty_state()));
    }

    #[test]
    fn test_add_combines_validators() {
        let mut map = ValidatorMap::new();
        map.add("age", |v, _| v.as_integer().is_some_and(|i| i > 0));
        map.add("age", |v, _| v.as_integer().is_some_and(|i| i < 150));

        let v = map.get("age").expect("validator should exist");
        assert!(v.validate(&FieldValue::Integer(30), &empty_state()));
        assert!(!v.validate(&FieldValue::Integer(0), &empty_state()));
        assert!(!v.validate(&FieldValue::Integer(200), &empty_state()));
    }

    #[test]
    fn test_all_of_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reject: Arc<dyn Validator> = Arc::new(|_: &FieldValue, _: &Record| false);
        let counted: Arc<dyn Validator> = Arc::new(move |_: &FieldValue, _: &Record| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let all = AllOf::new(vec![reject, counted]);

        assert!(!all.validate(&FieldValue::Null, &empty_state()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_all_of_accepts() {
        assert!(AllOf::default().validate(&FieldValue::Null, &empty_state()));
    }

    #[test]
    fn test_fields_in_insertion_order() {
        let map = ValidatorMap::new()
            .with("id", |_, _| true)
            .with("created", |_, _| true)
            .with("name", |_, _| true);

        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["id", "created", "name"]);
        assert!(map.contains("created"));
        assert!(!map.contains("email"));
    }

    #[test]
    fn test_evaluate_fails_closed_on_panic() {
        let v = |_: &FieldValue, _: &Record| -> bool { panic!("broken validator") };
        assert!(!evaluate("name", &v, &FieldValue::Null, &empty_state()));
    }

    #[test]
    fn test_debug_lists_fields() {
        let map = ValidatorMap::new().with("name", |_, _| true);
        assert_eq!(format!("{:?}", map), r#"ValidatorMap { fields: ["name"] }"#);
    }
}
