//! Field value types and field definitions

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Smallest width a field column can be resized to.
pub const MIN_FIELD_WIDTH: f64 = 100.0;

/// Width used for fields that do not declare one.
pub const DEFAULT_FIELD_WIDTH: f64 = 200.0;

/// Write a width as an integer when it has no fractional part
///
/// `180` read from persisted JSON is written back as `180`, not `180.0`.
pub(crate) fn serialize_width<S: Serializer>(
    width: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match width {
        Some(w) if w.fract() == 0.0 && w.abs() <= EXACT_LIMIT => serializer.serialize_some(&(*w as i64)),
        Some(w) => serializer.serialize_some(w),
        None => serializer.serialize_none(),
    }
}

/// A polymorphic field value that can hold different types
///
/// Record values are heterogeneous: a single field may hold numbers in one
/// record and strings in another. Every comparison and filter in the engine
/// is total over this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    /// Values of a multi-select field
    List(Vec<FieldValue>),
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

    /// Get the value as a number if it is an integer or a float
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the value as a boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a date if possible
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Check if the value is an integer or a float
    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }

    /// String representation used for coercion, grouping and text filters.
    ///
    /// Floats with no fractional part print without a decimal point, lists
    /// are joined with commas and null is the empty string.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Null => String::new(),
        }
    }

    /// Convert back to plain JSON (dates become RFC 3339 strings)
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::DateTime(_) => Value::String(self.to_display_string()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Null => Value::Null,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            // Nested objects are opaque to the engine; keep their JSON text
            Value::Object(_) => FieldValue::String(value.to_string()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from(&value)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Declared data type of a field
///
/// Only a hint for comparison and formatting: the records themselves may
/// carry values of any type in any field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
    #[serde(other)]
    Other,
}

/// Definition of a field (column) owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field identifier, the key used in records
    pub id: String,

    /// Human-readable label
    #[serde(alias = "display_name", alias = "name", alias = "label")]
    pub display_name: String,

    /// Type hint
    #[serde(default, alias = "data_type", alias = "type")]
    pub data_type: DataType,

    /// Whether the field is shown
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Display position (lower first)
    #[serde(default)]
    pub order: i32,

    /// Column width in pixels
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_width"
    )]
    pub width: Option<f64>,
}

fn default_visible() -> bool {
    true
}

impl FieldDefinition {
    /// Create a visible field with no explicit width
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            data_type,
            visible: true,
            order: 0,
            width: None,
        }
    }

    /// Shorthand for a text field.
    pub fn text(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, DataType::Text)
    }

    /// Shorthand for a numeric field.
    pub fn number(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, DataType::Number)
    }

    /// Shorthand for a date field.
    pub fn date(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, DataType::Date)
    }

    /// Set the display position
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set the column width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Mark the field as hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Width to lay the column out with
    pub fn effective_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_FIELD_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_numbers() {
        assert_eq!(FieldValue::Integer(42).as_number(), Some(42.0));
        assert_eq!(FieldValue::Float(2.5).as_number(), Some(2.5));
        assert!(FieldValue::Float(2.5).is_number());
        assert!(!FieldValue::String("2.5".into()).is_number());
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.as_string(), None);
        assert_eq!(value.to_display_string(), "");
    }

    #[test]
    fn test_display_string_matches_plain_text_forms() {
        assert_eq!(FieldValue::Float(30.0).to_display_string(), "30");
        assert_eq!(FieldValue::Float(30.5).to_display_string(), "30.5");
        assert_eq!(FieldValue::Boolean(true).to_display_string(), "true");
        assert_eq!(
            FieldValue::List(vec!["a".into(), FieldValue::Integer(2)]).to_display_string(),
            "a,2"
        );
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(7)), FieldValue::Integer(7));
        assert_eq!(FieldValue::from(json!(7.25)), FieldValue::Float(7.25));
        assert_eq!(FieldValue::from(json!("x")), FieldValue::String("x".into()));
        assert_eq!(
            FieldValue::from(json!(["a", "b"])),
            FieldValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            FieldValue::from(json!({"k": 1})),
            FieldValue::String("{\"k\":1}".into())
        );
    }

    #[test]
    fn test_to_json_roundtrip() {
        for value in [json!("hello"), json!(42), json!(1.5), json!(false), json!(null)] {
            assert_eq!(FieldValue::from(&value).to_json(), value);
        }
    }

    #[test]
    fn test_field_definition_from_json_defaults() {
        let field: FieldDefinition =
            serde_json::from_value(json!({"id": "status", "name": "Status", "type": "select"}))
                .expect("deserialize should succeed");

        assert_eq!(field.display_name, "Status");
        assert_eq!(field.data_type, DataType::Select);
        assert!(field.visible);
        assert_eq!(field.order, 0);
        assert_eq!(field.effective_width(), DEFAULT_FIELD_WIDTH);
    }

    #[test]
    fn test_field_definition_unknown_type_is_other() {
        let field: FieldDefinition = serde_json::from_value(
            json!({"id": "rating", "displayName": "Rating", "dataType": "stars"}),
        )
        .expect("deserialize should succeed");

        assert_eq!(field.data_type, DataType::Other);
    }

    #[test]
    fn test_field_definition_builders() {
        let field = FieldDefinition::number("age", "Age")
            .with_order(2)
            .with_width(120.0)
            .hidden();

        assert_eq!(field.data_type, DataType::Number);
        assert_eq!(field.order, 2);
        assert_eq!(field.width, Some(120.0));
        assert!(!field.visible);
    }
}
