//! Records and record keys

use crate::core::error::ConfigWarning;
use crate::core::field::FieldValue;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Field used as record key when none is configured
pub const DEFAULT_KEY_FIELD: &str = "id";

static NULL: FieldValue = FieldValue::Null;

/// Opaque record identifier taken from the key field
///
/// Keys keep the kind of value they came from, so the integer `1` and the
/// string `"1"` are different keys. Any other non-null value (float, boolean,
/// date, list, object) becomes [`RecordKey::Other`] holding its string form.
///
/// Serialized untagged: `1`, `"1"` and `{"value": "2.5"}` respectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Integer(i64),
    Text(String),
    Other { value: String },
}

impl RecordKey {
    /// Key for a key-field value, `None` for null
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => None,
            FieldValue::Integer(i) => Some(Self::Integer(*i)),
            FieldValue::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Other {
                value: other.to_display_string(),
            }),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Integer(i) => write!(f, "{}", i),
            RecordKey::Text(s) | RecordKey::Other { value: s } => f.write_str(s),
        }
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for RecordKey {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for RecordKey {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

/// One item of the collection being listed
///
/// A mapping from field id to value. Absent fields read as [`FieldValue::Null`].
/// Deserializes from any JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Value>", into = "IndexMap<String, Value>")]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, returning the previous value
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Value of a field; absent fields are null
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Key of this record under the given key field
    pub fn key(&self, key_field: &str) -> Option<RecordKey> {
        RecordKey::from_value(self.get(key_field))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, Value>> for Record {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }
}

impl From<Record> for IndexMap<String, Value> {
    fn from(record: Record) -> Self {
        record
            .fields
            .into_iter()
            .map(|(k, v)| (k, v.to_json()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a JSON array of objects into records
pub fn records_from_json(value: Value) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_value(value)
}

/// Keys of the given records, in record order
///
/// Records without a key are skipped. Duplicate keys are an invariant
/// violation of the caller: they are reported and the last occurrence wins.
pub fn collect_keys<'a, I>(records: I, key_field: &str) -> (IndexSet<RecordKey>, Vec<ConfigWarning>)
where
    I: IntoIterator<Item = &'a Record>,
{
    let index = index_by_key(records, key_field);
    (index.0.into_keys().collect(), index.1)
}

/// Key-indexed view of a record collection (last duplicate wins)
pub fn index_by_key<'a, I>(
    records: I,
    key_field: &str,
) -> (IndexMap<RecordKey, &'a Record>, Vec<ConfigWarning>)
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut index: IndexMap<RecordKey, &'a Record> = IndexMap::new();
    let mut warnings = Vec::new();

    for record in records {
        let Some(key) = record.key(key_field) else {
            continue;
        };
        if let Some(slot) = index.get_mut(&key) {
            tracing::warn!(key = %key, key_field, "duplicate record key, last record wins");
            *slot = record;
            warnings.push(ConfigWarning::DuplicateKey { key });
        } else {
            index.insert(key, record);
        }
    }

    (index, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_field_reads_as_null() {
        let record = Record::new().with("name", "Amy");
        assert!(record.get("age").is_null());
        assert!(!record.contains_field("age"));
        assert_eq!(record.get("name").as_string(), Some("Amy"));
    }

    #[test]
    fn test_record_from_json_object() {
        let record: Record = serde_json::from_value(json!({"id": 1, "name": "Bob", "age": null}))
            .expect("deserialize should succeed");

        assert_eq!(record.len(), 3);
        assert_eq!(record.key("id"), Some(RecordKey::from(1)));
        assert!(record.get("age").is_null());
    }

    #[test]
    fn test_record_serializes_back_to_plain_json() {
        let value = json!({"id": "a", "score": 2.5, "tags": ["x", "y"], "done": true});
        let record: Record = serde_json::from_value(value.clone()).expect("deserialize");
        assert_eq!(serde_json::to_value(&record).expect("serialize"), value);
    }

    #[test]
    fn test_null_key_is_no_key() {
        let record = Record::new().with("id", FieldValue::Null);
        assert_eq!(record.key("id"), None);
        assert_eq!(record.key("missing"), None);
    }

    #[test]
    fn test_integer_and_string_keys_are_distinct() {
        let records = vec![
            Record::new().with("id", 1i64),
            Record::new().with("id", "1"),
            Record::new().with("id", 1.5),
            Record::new().with("id", "1.5"),
        ];

        let (keys, warnings) = collect_keys(&records, "id");

        assert!(warnings.is_empty());
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec![
                RecordKey::Integer(1),
                RecordKey::Text("1".to_string()),
                RecordKey::Other {
                    value: "1.5".to_string()
                },
                RecordKey::Text("1.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_record_key_json_forms() {
        let keys = vec![
            RecordKey::from(1),
            RecordKey::from("1"),
            RecordKey::Other {
                value: "true".to_string(),
            },
        ];

        let json = serde_json::to_value(&keys).expect("serialize");
        assert_eq!(json, json!([1, "1", {"value": "true"}]));
        let back: Vec<RecordKey> = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, keys);
    }

    #[test]
    fn test_index_by_key_last_duplicate_wins() {
        let records = vec![
            Record::new().with("id", 1i64).with("v", "first"),
            Record::new().with("id", 2i64),
            Record::new().with("id", 1i64).with("v", "second"),
        ];

        let (index, warnings) = index_by_key(&records, "id");

        assert_eq!(index.len(), 2);
        assert_eq!(index[&RecordKey::from(1)].get("v").as_string(), Some("second"));
        assert_eq!(
            warnings,
            vec![ConfigWarning::DuplicateKey {
                key: RecordKey::from(1)
            }]
        );
    }

    #[test]
    fn test_collect_keys_skips_keyless_records() {
        let records = vec![
            Record::new().with("id", "b"),
            Record::new().with("name", "no key"),
            Record::new().with("id", "a"),
        ];

        let (keys, warnings) = collect_keys(&records, DEFAULT_KEY_FIELD);

        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec![RecordKey::from("b"), RecordKey::from("a")]
        );
        assert!(warnings.is_empty());
    }
}
