//! Declarative helpers for building records and validator maps

pub mod macros;
