//! Typed error handling for this-guard
//!
//! Only construction and configuration can fail. A write that a validator
//! rejects is not an error: it leaves the field unchanged and returns
//! normally.
//!
//! # Error Categories
//!
//! - [`ConstructionError`]: the record or validator map handed to
//!   [`wrap`](crate::core::proxy::wrap) or an
//!   [`EntityFactory`](crate::core::entity::EntityFactory) is malformed
//! - [`ConfigError`]: a declarative schema could not be loaded or compiled
//!
//! # Example
//!
//! ```rust,ignore
//! use this_guard::prelude::*;
//!
//! match wrap_value("not a record", ValidatorMap::new()) {
//!     Err(GuardError::Construction(ConstructionError::NotAnObject { found })) => {
//!         println!("cannot wrap a {}", found);
//!     }
//!     other => println!("{:?}", other),
//! }
//! ```

use std::fmt;

/// Result alias used across the crate
pub type GuardResult<T> = std::result::Result<T, GuardError>;

/// The main error type for this-guard
#[derive(Debug)]
pub enum GuardError {
    /// The record or validator map could not be wrapped
    Construction(ConstructionError),

    /// A declarative schema could not be loaded or compiled
    Config(ConfigError),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::Construction(e) => write!(f, "{}", e),
            GuardError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GuardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuardError::Construction(e) => Some(e),
            GuardError::Config(e) => Some(e),
        }
    }
}

impl GuardError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GuardError::Construction(e) => e.error_code(),
            GuardError::Config(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Construction Errors
// =============================================================================

/// Errors raised while wrapping a record
#[derive(Debug, Clone, PartialEq)]
pub enum ConstructionError {
    /// The value to wrap is not a structured object
    NotAnObject { found: &'static str },

    /// The validator map guards a field the record does not declare
    UnknownField { field: String },

    /// A field required by the entity shape or schema is absent
    MissingField { field: String },

    /// A field is present but holds the wrong kind of value
    InvalidField {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::NotAnObject { found } => {
                write!(f, "Cannot wrap a {}: expected an object", found)
            }
            ConstructionError::UnknownField { field } => {
                write!(
                    f,
                    "Validator declared for field '{}' which the record does not have",
                    field
                )
            }
            ConstructionError::MissingField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ConstructionError::InvalidField {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Field '{}' must be a {} (found: {})",
                    field, expected, found
                )
            }
        }
    }
}

impl std::error::Error for ConstructionError {}

impl ConstructionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConstructionError::NotAnObject { .. } => "NOT_AN_OBJECT",
            ConstructionError::UnknownField { .. } => "UNKNOWN_FIELD",
            ConstructionError::MissingField { .. } => "MISSING_FIELD",
            ConstructionError::InvalidField { .. } => "INVALID_FIELD",
        }
    }
}

impl From<ConstructionError> for GuardError {
    fn from(err: ConstructionError) -> Self {
        GuardError::Construction(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to declarative schemas
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse a schema document
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Rule name not known
    UnknownRule { field: String, rule: String },

    /// Rule arguments have the wrong shape
    InvalidRuleArgument {
        field: String,
        rule: String,
        message: String,
    },

    /// Schema file not found
    FileNotFound { path: String },

    /// IO error while reading a schema file
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse schema file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse schema: {}", message)
                }
            }
            ConfigError::UnknownRule { field, rule } => {
                write!(f, "Unknown rule '{}' on field '{}'", rule, field)
            }
            ConfigError::InvalidRuleArgument {
                field,
                rule,
                message,
            } => {
                write!(
                    f,
                    "Invalid arguments for rule '{}' on field '{}': {}",
                    rule, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Schema file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "SCHEMA_PARSE_ERROR",
            ConfigError::UnknownRule { .. } => "UNKNOWN_RULE",
            ConfigError::InvalidRuleArgument { .. } => "INVALID_RULE_ARGUMENT",
            ConfigError::FileNotFound { .. } => "SCHEMA_NOT_FOUND",
            ConfigError::IoError { .. } => "IO_ERROR",
        }
    }
}

impl From<ConfigError> for GuardError {
    fn from(err: ConfigError) -> Self {
        GuardError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_error_display() {
        let err = GuardError::from(ConstructionError::InvalidField {
            field: "created".to_string(),
            expected: "datetime",
            found: "string",
        });

        assert_eq!(
            err.to_string(),
            "Field 'created' must be a datetime (found: string)"
        );
        assert_eq!(err.error_code(), "INVALID_FIELD");
    }

    #[test]
    fn test_config_error_display_with_file() {
        let err = ConfigError::ParseError {
            file: Some("user.yaml".to_string()),
            message: "bad indent".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Failed to parse schema file 'user.yaml': bad indent"
        );
    }

    #[test]
    fn test_source_is_inner_error() {
        use std::error::Error;

        let err = GuardError::from(ConfigError::FileNotFound {
            path: "missing.yaml".to_string(),
        });
        assert!(err.source().is_some());
    }
}
