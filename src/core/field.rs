//! Field value types, records and format checks

use crate::core::proxy::ValidatedObject;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// An ordered mapping from property name to value.
///
/// Insertion order is preserved so a wrapped record enumerates its keys in
/// the order they were declared.
pub type Record = IndexMap<String, FieldValue>;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Array(Vec<FieldValue>),
    /// A plain nested structure with no write interception
    Object(Record),
    /// A nested validated object; serializes as its current record
    #[serde(skip_deserializing)]
    Validated(ValidatedObject),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the nested plain record, if this is a plain object
    pub fn as_object(&self) -> Option<&Record> {
        match self {
            FieldValue::Object(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_validated(&self) -> Option<&ValidatedObject> {
        match self {
            FieldValue::Validated(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_validated_mut(&mut self) -> Option<&mut ValidatedObject> {
        match self {
            FieldValue::Validated(object) => Some(object),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if the value is a structured object (plain or validated)
    pub fn is_object(&self) -> bool {
        matches!(self, FieldValue::Object(_) | FieldValue::Validated(_))
    }

    /// Identity comparison: like `==`, except floats compare by bit pattern,
    /// so a NaN is the same as an identical NaN.
    pub fn same_as(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Float(a), FieldValue::Float(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Array(a), FieldValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            (FieldValue::Object(a), FieldValue::Object(b)) => same_record(a, b),
            (FieldValue::Validated(a), FieldValue::Validated(b)) => {
                same_record(a.record(), b.record())
            }
            _ => self == other,
        }
    }

    /// Short lowercase name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Uuid(_) => "uuid",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
            FieldValue::Validated(_) => "validated object",
            FieldValue::Null => "null",
        }
    }

    /// Convert to a `serde_json::Value`.
    ///
    /// Uuids and timestamps become strings (RFC 3339 for timestamps), nested
    /// validated objects become their current record.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
            }
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Uuid(u) => Value::String(u.to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
            FieldValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            FieldValue::Object(record) => record_to_json(record),
            FieldValue::Validated(object) => record_to_json(object.record()),
            FieldValue::Null => Value::Null,
        }
    }
}

fn same_record(a: &Record, b: &Record) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, value)| b.get(key).is_some_and(|other| value.same_as(other)))
}

/// Convert a record to a JSON object, preserving key order
pub fn record_to_json(record: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        record
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

/// Capability check: true iff the value is a non-null structured object.
///
/// Scalars, arrays and `Null` are not objects.
pub fn is_object(value: &FieldValue) -> bool {
    value.is_object()
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
            },
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => FieldValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Record> for FieldValue {
    fn from(value: Record) -> Self {
        FieldValue::Object(value)
    }
}

impl From<ValidatedObject> for FieldValue {
    fn from(value: ValidatedObject) -> Self {
        FieldValue::Validated(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// String formats that can be checked on a field value
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Uuid,
    Url,
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Parse a format name (`email`, `uuid`, `url`, `phone`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(FieldFormat::Email),
            "uuid" => Some(FieldFormat::Uuid),
            "url" => Some(FieldFormat::Url),
            "phone" => Some(FieldFormat::Phone),
            _ => None,
        }
    }

    /// Validate a field value against this format
    pub fn validate(&self, value: &FieldValue) -> bool {
        if let (FieldFormat::Uuid, FieldValue::Uuid(_)) = (self, value) {
            return true;
        }

        let string_value = match value.as_string() {
            Some(s) => s,
            None => return false,
        };

        match self {
            FieldFormat::Email => Self::is_valid_email(string_value),
            FieldFormat::Uuid => Uuid::parse_str(string_value).is_ok(),
            FieldFormat::Url => Self::is_valid_url(string_value),
            FieldFormat::Phone => Self::is_valid_phone(string_value),
            FieldFormat::Custom(regex) => regex.is_match(string_value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        regex.is_match(email)
    }

    fn is_valid_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());
        regex.is_match(url)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            // E.164: 8 to 15 digits
            Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap()
        });
        regex.is_match(phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::ValidatorMap;
    use serde_json::json;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::from("test");
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
        assert!(!value.is_object());
    }

    #[test]
    fn test_field_value_integer_widens_to_float() {
        let value = FieldValue::from(42);
        assert_eq!(value.as_integer(), Some(42));
        assert_eq!(value.as_float(), Some(42.0));
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_field_value_option() {
        assert!(FieldValue::from(None::<String>).is_null());
        assert_eq!(FieldValue::from(Some("x")), FieldValue::String("x".to_string()));
    }

    #[test]
    fn test_is_object_capability_check() {
        let mut record = Record::new();
        record.insert("value".to_string(), FieldValue::from("my@email.com"));

        assert!(is_object(&FieldValue::Object(record.clone())));

        let wrapped = crate::core::proxy::wrap(record, ValidatorMap::new()).unwrap();
        assert!(is_object(&FieldValue::Validated(wrapped)));

        assert!(!is_object(&FieldValue::Null));
        assert!(!is_object(&FieldValue::from("my@email.com")));
        assert!(!is_object(&FieldValue::from(7)));
        assert!(!is_object(&FieldValue::Array(vec![])));
    }

    #[test]
    fn test_from_json_object_keeps_order() {
        let value = FieldValue::from(json!({"b": 1, "a": "x", "c": null}));
        let record = value.as_object().expect("should be an object");
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(record["b"], FieldValue::Integer(1));
        assert!(record["c"].is_null());
    }

    #[test]
    fn test_same_as_compares_floats_by_bits() {
        let nan = FieldValue::Float(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.same_as(&nan.clone()));
        assert!(!FieldValue::Float(0.0).same_as(&FieldValue::Float(-0.0)));

        let nested = FieldValue::Array(vec![nan.clone(), FieldValue::from("x")]);
        assert!(nested.same_as(&nested.clone()));
        assert!(!nested.same_as(&FieldValue::Array(vec![nan])));
        assert!(FieldValue::from("x").same_as(&FieldValue::from("x")));
    }

    #[test]
    fn test_record_to_json_keeps_order() {
        let mut record = Record::new();
        record.insert("zeta".to_string(), FieldValue::Integer(1));
        record.insert("alpha".to_string(), FieldValue::Integer(2));

        let json = record_to_json(&record);
        let keys: Vec<&str> = json
            .as_object()
            .expect("should be an object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_from_json_float() {
        assert_eq!(FieldValue::from(json!(2.5)), FieldValue::Float(2.5));
    }

    #[test]
    fn test_to_json_datetime_and_uuid() {
        let id = Uuid::new_v4();
        let now = Utc::now();

        assert_eq!(FieldValue::Uuid(id).to_json(), json!(id.to_string()));
        assert_eq!(FieldValue::DateTime(now).to_json(), json!(now.to_rfc3339()));
    }

    #[test]
    fn test_serde_roundtrip_string() {
        let original = FieldValue::String("hello".to_string());
        let json = serde_json::to_string(&original).expect("serialize should succeed");
        let restored: FieldValue =
            serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_serde_nested_object() {
        let restored: FieldValue =
            serde_json::from_str(r#"{"value":"a@b.io","tags":["x"]}"#).expect("valid json");
        let record = restored.as_object().expect("should be an object");

        assert_eq!(record["value"], FieldValue::from("a@b.io"));
        assert_eq!(record["tags"], FieldValue::Array(vec![FieldValue::from("x")]));
    }

    #[test]
    fn test_email_validation() {
        let format = FieldFormat::Email;

        assert!(format.validate(&FieldValue::from("test@example.com")));
        assert!(format.validate(&FieldValue::from("user.name+tag@example.co.uk")));
        assert!(!format.validate(&FieldValue::from("invalid-email")));
        assert!(!format.validate(&FieldValue::from("@example.com")));
    }

    #[test]
    fn test_uuid_validation_accepts_uuid_values() {
        let format = FieldFormat::Uuid;
        let id = Uuid::new_v4();

        assert!(format.validate(&FieldValue::Uuid(id)));
        assert!(format.validate(&FieldValue::String(id.to_string())));
        assert!(!format.validate(&FieldValue::from("not-a-uuid")));
    }

    #[test]
    fn test_url_and_phone_validation() {
        assert!(FieldFormat::Url.validate(&FieldValue::from("https://example.com")));
        assert!(!FieldFormat::Url.validate(&FieldValue::from("not a url")));
        assert!(FieldFormat::Phone.validate(&FieldValue::from("+33612345678")));
        assert!(!FieldFormat::Phone.validate(&FieldValue::from("123")));
    }

    #[test]
    fn test_custom_regex_validation() {
        let format = FieldFormat::Custom(Regex::new(r"^[A-Z]{3}\d{3}$").unwrap());

        assert!(format.validate(&FieldValue::from("ABC123")));
        assert!(!format.validate(&FieldValue::from("abc123")));
    }

    #[test]
    fn test_format_from_name() {
        assert!(matches!(FieldFormat::from_name("email"), Some(FieldFormat::Email)));
        assert!(FieldFormat::from_name("postcode").is_none());
    }

    #[test]
    fn test_format_validate_rejects_non_string() {
        let format = FieldFormat::Email;
        assert!(!format.validate(&FieldValue::Integer(42)));
        assert!(!format.validate(&FieldValue::Boolean(true)));
        assert!(!format.validate(&FieldValue::Null));
    }
}
