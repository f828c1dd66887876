//! Multi-key stable sorting

use crate::core::compare::compare;
use crate::core::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One `(field, direction)` entry of a sort spec
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Compare two records on this key
    ///
    /// `desc` reverses the value comparison only. Nulls trail in both
    /// directions.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = a.get(&self.field);
        let right = b.get(&self.field);
        match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare(left, right);
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Parses `field`, `field:asc` or `field:desc`
///
/// An unrecognised direction falls back to ascending.
impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, dir)) => {
                let direction = if dir.trim().eq_ignore_ascii_case("desc") {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                (field.trim(), direction)
            }
            None => (s, SortDirection::Asc),
        };
        Ok(SortKey::new(field, direction))
    }
}

/// Ordered sequence of sort keys; the first is primary
///
/// An empty spec leaves the input order untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self(keys)
    }

    /// Spec with a single key
    pub fn single(field: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![SortKey::new(field, direction)])
    }

    /// Parse a comma separated list such as `status,created_at:desc`
    pub fn parse(s: &str) -> Self {
        Self(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse::<SortKey>().ok())
                .filter(|key| !key.field.is_empty())
                .collect(),
        )
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn primary(&self) -> Option<&SortKey> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Append a tie-breaking key
    pub fn push(&mut self, key: SortKey) {
        self.0.push(key);
    }

    /// Remove the key at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<SortKey> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Result of clicking a field's header
    ///
    /// Clicking the current primary field flips its direction, any other
    /// field becomes the only key, ascending.
    pub fn toggled(&self, field: &str) -> Self {
        match self.primary() {
            Some(primary) if primary.field == field => {
                Self::single(field, primary.direction.reversed())
            }
            _ => Self::single(field, SortDirection::Asc),
        }
    }

    /// Compare two records, falling through the keys on ties
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        self.0
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Field ids referenced by the spec
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|key| key.field.as_str())
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl From<Vec<SortKey>> for SortSpec {
    fn from(keys: Vec<SortKey>) -> Self {
        Self(keys)
    }
}

impl FromIterator<SortKey> for SortSpec {
    fn from_iter<T: IntoIterator<Item = SortKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Sort records by a spec
///
/// The sort is stable: records that tie on every key keep their input order,
/// and an empty spec returns the input order unchanged.
pub fn sort<'a, I>(records: I, spec: &SortSpec) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sorted: Vec<&'a Record> = records.into_iter().collect();
    if !spec.is_empty() {
        sorted.sort_by(|a, b| spec.compare(a, b));
    }
    sorted
}
