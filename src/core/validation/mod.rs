//! Validation system
//!
//! Validators are single-method predicates over a candidate value and the
//! record state before a write. They are keyed by field name in a
//! [`ValidatorMap`] and are applied by [`ValidatedObject`](crate::core::proxy::ValidatedObject)
//! on every write.
//!
//! Validators fail closed: a validator that panics rejects the write. The
//! panic is still reported by the process panic hook (by default a message
//! on stderr) before it is caught; install a quieter hook with
//! `std::panic::set_hook` if that output is unwanted.

pub mod validator;
pub mod validators;

pub use validator::{AllOf, Validator, ValidatorMap};
