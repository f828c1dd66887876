//! Grouping records by a field value

use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label of the bucket holding records whose group field is null or absent
pub const UNGROUPED_LABEL: &str = "Ungrouped";

/// Label of the single bucket used when no group field is set
pub const IMPLICIT_GROUP_LABEL: &str = "";

/// Records partitioned into labelled buckets
///
/// Buckets keep first-seen order and records keep input order inside a bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping<'a> {
    buckets: IndexMap<String, Vec<&'a Record>>,
}

impl<'a> Grouping<'a> {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn get(&self, label: &str) -> Option<&[&'a Record]> {
        self.buckets.get(label).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Record])> {
        self.buckets
            .iter()
            .map(|(label, records)| (label.as_str(), records.as_slice()))
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of records across all buckets
    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn into_buckets(self) -> IndexMap<String, Vec<&'a Record>> {
        self.buckets
    }
}

/// Label a record falls under for a group field
pub fn group_label(record: &Record, field: &str) -> String {
    let value = record.get(field);
    if value.is_null() {
        UNGROUPED_LABEL.to_string()
    } else {
        value.to_display_string()
    }
}

/// Partition records by the value of `field`
///
/// Without a field every record lands in one implicit bucket labelled
/// [`IMPLICIT_GROUP_LABEL`]; an empty input yields no buckets.
pub fn group<'a, I>(records: I, field: Option<&str>) -> Grouping<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: IndexMap<String, Vec<&'a Record>> = IndexMap::new();

    for record in records {
        let label = match field {
            Some(field) => group_label(record, field),
            None => IMPLICIT_GROUP_LABEL.to_string(),
        };
        buckets.entry(label).or_default().push(record);
    }

    Grouping { buckets }
}

/// Expanded/collapsed state of group buckets
///
/// Labels never toggled report the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExpansion {
    #[serde(default = "default_expanded")]
    pub default_expanded: bool,
    #[serde(default)]
    overrides: IndexMap<String, bool>,
}

fn default_expanded() -> bool {
    true
}

impl Default for GroupExpansion {
    fn default() -> Self {
        Self::new(default_expanded())
    }
}

impl GroupExpansion {
    pub fn new(default_expanded: bool) -> Self {
        Self {
            default_expanded,
            overrides: IndexMap::new(),
        }
    }

    pub fn is_expanded(&self, label: &str) -> bool {
        self.overrides
            .get(label)
            .copied()
            .unwrap_or(self.default_expanded)
    }

    /// Flip a bucket, returning its new state
    pub fn toggle(&mut self, label: &str) -> bool {
        let expanded = !self.is_expanded(label);
        self.overrides.insert(label.to_string(), expanded);
        expanded
    }

    pub fn set(&mut self, label: impl Into<String>, expanded: bool) {
        self.overrides.insert(label.into(), expanded);
    }

    /// Forget every toggle, e.g. when the group field changes
    pub fn reset(&mut self) {
        self.overrides.clear();
    }
}
