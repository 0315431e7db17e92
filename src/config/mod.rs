//! Declarative schema loading
//!
//! A schema document names an entity and lists rules per field:
//!
//! ```yaml
//! entity: user
//! fields:
//!   id: [{ min_length: 3 }]
//!   name: [required, { string_length: [3, 50] }]
//!   email: [{ format: email }]
//!   role: [{ in_list: [admin, member] }]
//! ```
//!
//! Rules without arguments are plain names; rules with arguments are
//! single-key maps. Several rules on one field must all accept.

use crate::core::entity::EntityFactory;
use crate::core::error::{ConfigError, GuardResult};
use crate::core::field::FieldFormat;
use crate::core::validation::validators;
use crate::core::validation::{Validator, ValidatorMap};
use indexmap::IndexMap;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// One rule entry in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// A rule without arguments, e.g. `required`
    Name(String),

    /// A rule with arguments, e.g. `{ string_length: [3, 50] }`
    WithArgs(BTreeMap<String, serde_yaml::Value>),
}

impl RuleSpec {
    /// Compile this rule into a validator guarding `field`
    pub fn compile(&self, field: &str) -> Result<Arc<dyn Validator>, ConfigError> {
        let (rule, args) = match self {
            RuleSpec::Name(name) => (name.as_str(), None),
            RuleSpec::WithArgs(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((name, args)), None) => (name.as_str(), Some(args)),
                    _ => {
                        return Err(ConfigError::InvalidRuleArgument {
                            field: field.to_string(),
                            rule: map.keys().cloned().collect::<Vec<_>>().join(","),
                            message: "expected exactly one rule per entry".to_string(),
                        });
                    }
                }
            }
        };

        let validator: Arc<dyn Validator> = match (rule, args) {
            ("required", None) => Arc::new(validators::required()),
            ("optional", None) => Arc::new(validators::optional()),
            ("positive", None) => Arc::new(validators::positive()),
            ("datetime", None) => Arc::new(validators::is_datetime()),
            ("object", None) => Arc::new(validators::object()),
            ("changed", None) => Arc::new(validators::changed(field.to_string())),
            ("immutable", None) => Arc::new(validators::immutable(field.to_string())),
            ("reject_all", None) => Arc::new(validators::reject_all()),
            ("string_length", Some(args)) => {
                let (min, max): (usize, usize) = parse_args(field, rule, args)?;
                Arc::new(validators::string_length(min, max))
            }
            ("min_length", Some(args)) => {
                Arc::new(validators::min_length(parse_args(field, rule, args)?))
            }
            ("max_value", Some(args)) => {
                Arc::new(validators::max_value(parse_args(field, rule, args)?))
            }
            ("in_list", Some(args)) => Arc::new(validators::in_list(parse_args(field, rule, args)?)),
            ("date_format", Some(args)) => {
                let format: String = parse_args(field, rule, args)?;
                Arc::new(validators::date_format(format))
            }
            ("format", Some(args)) => {
                let name: String = parse_args(field, rule, args)?;
                let format =
                    FieldFormat::from_name(&name).ok_or_else(|| ConfigError::InvalidRuleArgument {
                        field: field.to_string(),
                        rule: rule.to_string(),
                        message: format!("unknown format '{}'", name),
                    })?;
                Arc::new(validators::format(format))
            }
            ("pattern", Some(args)) => {
                let pattern: String = parse_args(field, rule, args)?;
                let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidRuleArgument {
                    field: field.to_string(),
                    rule: rule.to_string(),
                    message: e.to_string(),
                })?;
                Arc::new(validators::format(FieldFormat::Custom(regex)))
            }
            (name, _) if is_known_rule(name) => {
                return Err(ConfigError::InvalidRuleArgument {
                    field: field.to_string(),
                    rule: name.to_string(),
                    message: if args.is_some() {
                        "rule takes no arguments".to_string()
                    } else {
                        "rule requires arguments".to_string()
                    },
                });
            }
            (name, _) => {
                return Err(ConfigError::UnknownRule {
                    field: field.to_string(),
                    rule: name.to_string(),
                });
            }
        };

        Ok(validator)
    }
}

const KNOWN_RULES: &[&str] = &[
    "required",
    "optional",
    "positive",
    "datetime",
    "object",
    "changed",
    "immutable",
    "reject_all",
    "string_length",
    "min_length",
    "max_value",
    "in_list",
    "date_format",
    "format",
    "pattern",
];

fn is_known_rule(name: &str) -> bool {
    KNOWN_RULES.contains(&name)
}

fn parse_args<T: DeserializeOwned>(
    field: &str,
    rule: &str,
    args: &serde_yaml::Value,
) -> Result<T, ConfigError> {
    serde_yaml::from_value(args.clone()).map_err(|e| ConfigError::InvalidRuleArgument {
        field: field.to_string(),
        rule: rule.to_string(),
        message: e.to_string(),
    })
}

/// Declarative validation schema for one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Entity type name (e.g., "user")
    #[serde(default)]
    pub entity: String,

    /// Rules per field, in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, Vec<RuleSpec>>,
}

impl SchemaConfig {
    /// Load a schema from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GuardResult<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load a schema from a YAML string
    pub fn from_yaml_str(yaml: &str) -> GuardResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::ParseError {
                file: None,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Compile every rule into a validator map
    pub fn validator_map(&self) -> GuardResult<ValidatorMap> {
        let mut map = ValidatorMap::new();
        for (field, rules) in &self.fields {
            for rule in rules {
                map.add_shared(field.as_str(), rule.compile(field)?);
            }
        }

        tracing::debug!(
            entity = %self.entity,
            guarded = map.len(),
            "compiled schema"
        );
        Ok(map)
    }

    /// Compile the schema and build an entity factory from it
    pub fn entity_factory(&self) -> GuardResult<EntityFactory> {
        Ok(EntityFactory::new(self.validator_map()?))
    }
}

/// Several schemas in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemasConfig {
    pub schemas: Vec<SchemaConfig>,
}

impl SchemasConfig {
    /// Load schemas from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GuardResult<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load schemas from a YAML string
    pub fn from_yaml_str(yaml: &str) -> GuardResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::ParseError {
                file: None,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Find the schema for an entity type
    pub fn find(&self, entity: &str) -> Option<&SchemaConfig> {
        self.schemas.iter().find(|s| s.entity == entity)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ConfigError::IoError {
            message: e.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldValue, Record};

    const USER_SCHEMA: &str = r#"
entity: user
fields:
  id: [{ min_length: 3 }]
  name: [required, { string_length: [3, 50] }]
  email: [{ format: email }]
  role: [{ in_list: [admin, member] }]
  score: [positive, { max_value: 100 }]
"#;

    fn empty() -> Record {
        Record::new()
    }

    #[test]
    fn test_parse_schema() {
        let schema = SchemaConfig::from_yaml_str(USER_SCHEMA).unwrap();

        assert_eq!(schema.entity, "user");
        assert_eq!(schema.fields.len(), 5);
        assert_eq!(schema.fields["name"][0], RuleSpec::Name("required".to_string()));
    }

    #[test]
    fn test_compiled_rules() {
        let map = SchemaConfig::from_yaml_str(USER_SCHEMA)
            .unwrap()
            .validator_map()
            .unwrap();

        let name = map.get("name").unwrap();
        assert!(name.validate(&FieldValue::from("daniel"), &empty()));
        assert!(!name.validate(&FieldValue::from("da"), &empty()));
        assert!(!name.validate(&FieldValue::Null, &empty()));

        let role = map.get("role").unwrap();
        assert!(role.validate(&FieldValue::from("admin"), &empty()));
        assert!(!role.validate(&FieldValue::from("root"), &empty()));

        let score = map.get("score").unwrap();
        assert!(score.validate(&FieldValue::from(100), &empty()));
        assert!(!score.validate(&FieldValue::from(0), &empty()));
        assert!(!score.validate(&FieldValue::from(101), &empty()));

        let email = map.get("email").unwrap();
        assert!(email.validate(&FieldValue::from("a@b.io"), &empty()));
        assert!(!email.validate(&FieldValue::from("a.b.io"), &empty()));
    }

    #[test]
    fn test_unknown_rule() {
        let schema = SchemaConfig::from_yaml_str("fields:\n  name: [shiny]\n").unwrap();
        let err = schema.validator_map().unwrap_err();

        assert_eq!(err.error_code(), "UNKNOWN_RULE");
        assert_eq!(err.to_string(), "Unknown rule 'shiny' on field 'name'");
    }

    #[test]
    fn test_missing_arguments() {
        let schema = SchemaConfig::from_yaml_str("fields:\n  name: [string_length]\n").unwrap();
        assert_eq!(
            schema.validator_map().unwrap_err().error_code(),
            "INVALID_RULE_ARGUMENT"
        );
    }

    #[test]
    fn test_bad_argument_shape() {
        let schema =
            SchemaConfig::from_yaml_str("fields:\n  name: [{ string_length: three }]\n").unwrap();
        assert!(schema.validator_map().is_err());
    }

    #[test]
    fn test_unknown_format() {
        let schema =
            SchemaConfig::from_yaml_str("fields:\n  code: [{ format: postcode }]\n").unwrap();
        assert!(schema.validator_map().is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let schema =
            SchemaConfig::from_yaml_str("fields:\n  code: [{ pattern: \"[\" }]\n").unwrap();
        assert!(schema.validator_map().is_err());
    }

    #[test]
    fn test_pattern_rule() {
        let map = SchemaConfig::from_yaml_str("fields:\n  code: [{ pattern: \"^[A-Z]{3}$\" }]\n")
            .unwrap()
            .validator_map()
            .unwrap();

        let code = map.get("code").unwrap();
        assert!(code.validate(&FieldValue::from("ABC"), &empty()));
        assert!(!code.validate(&FieldValue::from("abc"), &empty()));
    }

    #[test]
    fn test_parse_error() {
        let err = SchemaConfig::from_yaml_str("fields: [").unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_PARSE_ERROR");
    }

    #[test]
    fn test_yaml_serialization() {
        let schema = SchemaConfig::from_yaml_str(USER_SCHEMA).unwrap();
        let yaml = serde_yaml::to_string(&schema).unwrap();

        let parsed = SchemaConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn test_schemas_find() {
        let schemas = SchemasConfig::from_yaml_str(
            r#"
schemas:
  - entity: user
    fields:
      name: [{ min_length: 3 }]
  - entity: email
    fields:
      value: [changed]
"#,
        )
        .unwrap();

        assert!(schemas.find("email").is_some());
        assert!(schemas.find("car").is_none());
    }
}
