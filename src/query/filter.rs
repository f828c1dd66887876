//! Predicate filtering
//!
//! A [`FilterSet`] is the conjunction of named [`FilterPredicate`]s. Filter ids
//! are arbitrary so a UI can add and remove predicates independently; the map
//! keeps insertion order for display and serialization.

use crate::core::compare::{numeric_value, temporal_value};
use crate::core::field::FieldValue;
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Comparison applied by a predicate
///
/// Operators the engine does not know are kept verbatim in
/// [`FilterOperator::Unknown`] so they survive a save/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Unknown(String),
}

impl FilterOperator {
    pub fn parse(s: &str) -> Self {
        match s {
            "equals" => FilterOperator::Equals,
            "contains" => FilterOperator::Contains,
            "startsWith" => FilterOperator::StartsWith,
            "endsWith" => FilterOperator::EndsWith,
            "greaterThan" => FilterOperator::GreaterThan,
            "lessThan" => FilterOperator::LessThan,
            other => FilterOperator::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::Unknown(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FilterOperator::Unknown(_))
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FilterOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FilterOperator::parse(&s))
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Field id the predicate reads
    pub field: String,
    pub operator: FilterOperator,
    /// Operand, kept as raw JSON
    #[serde(default)]
    pub value: Value,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Contains, value)
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::StartsWith, value)
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::EndsWith, value)
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value)
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThan, value)
    }

    /// A predicate still being edited (no field chosen yet)
    pub fn is_incomplete(&self) -> bool {
        self.field.trim().is_empty()
    }

    /// Whether the predicate takes part in filtering at all
    pub fn is_active(&self) -> bool {
        !self.is_incomplete() && self.operator.is_known()
    }

    /// Evaluate the predicate against a record
    ///
    /// Incomplete predicates and unknown operators let every record through.
    /// A null or absent field value fails every known operator.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }

        let actual = record.get(&self.field);
        if actual.is_null() {
            return false;
        }
        let expected = FieldValue::from(&self.value);

        match self.operator {
            FilterOperator::Equals => loosely_equal(actual, &expected),
            FilterOperator::Contains => folded(actual).contains(&folded(&expected)),
            FilterOperator::StartsWith => folded(actual).starts_with(&folded(&expected)),
            FilterOperator::EndsWith => folded(actual).ends_with(&folded(&expected)),
            FilterOperator::GreaterThan => ordinal(actual, &expected) == Some(Ordering::Greater),
            FilterOperator::LessThan => ordinal(actual, &expected) == Some(Ordering::Less),
            FilterOperator::Unknown(_) => true,
        }
    }
}

fn folded(value: &FieldValue) -> String {
    value.to_display_string().to_lowercase()
}

/// Native equality for matching numbers and booleans, otherwise string equality
fn loosely_equal(actual: &FieldValue, expected: &FieldValue) -> bool {
    let native = match (actual, expected) {
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
        (a, b) if a.is_number() && b.is_number() => a.as_number() == b.as_number(),
        _ => false,
    };
    native || actual.to_display_string() == expected.to_display_string()
}

/// Numeric ordering if both sides read as numbers, else temporal, else none
fn ordinal(actual: &FieldValue, expected: &FieldValue) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (numeric_value(actual), numeric_value(expected)) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (temporal_value(actual), temporal_value(expected)) {
        return Some(a.cmp(&b));
    }
    None
}

/// Named predicates combined with logical AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(IndexMap<String, FilterPredicate>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the predicate with this id
    pub fn insert(&mut self, id: impl Into<String>, predicate: FilterPredicate) -> Option<FilterPredicate> {
        self.0.insert(id.into(), predicate)
    }

    /// Builder-style insert
    pub fn with(mut self, id: impl Into<String>, predicate: FilterPredicate) -> Self {
        self.insert(id, predicate);
        self
    }

    /// Remove a predicate, keeping the order of the others
    pub fn remove(&mut self, id: &str) -> Option<FilterPredicate> {
        self.0.shift_remove(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, id: &str) -> Option<&FilterPredicate> {
        self.0.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterPredicate)> {
        self.0.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a record satisfies every predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.0.values().all(|predicate| predicate.matches(record))
    }

    /// Predicates whose operator is not implemented, as `(filter id, operator)`
    pub fn unknown_operators(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, p)| !p.operator.is_known())
            .map(|(id, p)| (id.as_str(), p.operator.as_str()))
    }

    /// Field ids read by active predicates
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .values()
            .filter(|p| p.is_active())
            .map(|p| p.field.as_str())
    }

    /// Build a filter set from the compact query form
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value}`
    ///
    /// Filter ids are the object keys. Anything but an object yields an empty set.
    pub fn from_query_value(filter: &Value) -> Self {
        let Some(object) = filter.as_object() else {
            return Self::default();
        };

        object
            .iter()
            .map(|(key, value)| {
                let predicate = if let Some(field) = key.strip_suffix('>') {
                    FilterPredicate::greater_than(field.trim(), value.clone())
                } else if let Some(field) = key.strip_suffix('<') {
                    FilterPredicate::less_than(field.trim(), value.clone())
                } else {
                    FilterPredicate::equals(key.trim(), value.clone())
                };
                (key.clone(), predicate)
            })
            .collect()
    }
}

impl FromIterator<(String, FilterPredicate)> for FilterSet {
    fn from_iter<T: IntoIterator<Item = (String, FilterPredicate)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Keep the records that satisfy every predicate, in input order
pub fn filter<'a, I>(records: I, filters: &FilterSet) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| filters.matches(record))
        .collect()
}
