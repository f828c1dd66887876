//! Saved view definitions

use crate::core::error::{RowsetError, ViewError};
use crate::core::field::serialize_width;
use crate::query::filter::FilterSet;
use crate::query::sort::SortSpec;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Per-field display settings stored in a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewField {
    pub id: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
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

impl ViewField {
    pub fn new(id: impl Into<String>, visible: bool) -> Self {
        Self {
            id: id.into(),
            visible,
            width: None,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// A named bundle of field layout, filters, sort and grouping
///
/// Pagination and selection are deliberately not part of a view.
///
/// # JSON format
///
/// ```json
/// {
///   "id": "view-1",
///   "name": "Open by owner",
///   "fields": [{"id": "owner", "visible": true, "width": 180}],
///   "filters": {"f1": {"field": "status", "operator": "equals", "value": "open"}},
///   "sortConfig": [{"field": "owner", "direction": "asc"}],
///   "groupBy": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// Unique id; left empty to have the store generate one
    #[serde(default)]
    pub id: String,

    /// Display name, need not be unique
    pub name: String,

    #[serde(default)]
    pub fields: Vec<ViewField>,

    #[serde(default)]
    pub filters: FilterSet,

    #[serde(default, alias = "sort_config")]
    pub sort_config: SortSpec,

    #[serde(default, alias = "group_by")]
    pub group_by: Option<String>,
}

impl ViewConfig {
    /// Empty view with the given name and no id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            fields: Vec::new(),
            filters: FilterSet::default(),
            sort_config: SortSpec::default(),
            group_by: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_fields(mut self, fields: Vec<ViewField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort_config: SortSpec) -> Self {
        self.sort_config = sort_config;
        self
    }

    pub fn with_group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// Check the view can be stored
    ///
    /// Rejects a blank name, duplicate field entries and widths that are
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ViewError> {
        let invalid = |message: String| ViewError::InvalidView {
            id: self.id.clone(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("view name must not be blank".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(invalid(format!("field '{}' is listed twice", field.id)));
            }
            if let Some(width) = field.width.filter(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid(format!(
                    "field '{}' has invalid width {}",
                    field.id, width
                )));
            }
        }

        Ok(())
    }

    /// Serialize to the persistence JSON format
    pub fn to_json(&self) -> Result<String, RowsetError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a view from its persistence JSON
    pub fn from_json(json: &str) -> Result<Self, RowsetError> {
        let view: ViewConfig = serde_json::from_str(json)?;
        view.validate()?;
        Ok(view)
    }
}

/// Partial update of a stored view; `None` leaves a part unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPatch {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub fields: Option<Vec<ViewField>>,

    #[serde(default)]
    pub filters: Option<FilterSet>,

    #[serde(default)]
    pub sort_config: Option<SortSpec>,

    /// `Some(None)` removes grouping
    #[serde(default, deserialize_with = "deserialize_some")]
    pub group_by: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent key
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ViewPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn fields(mut self, fields: Vec<ViewField>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn sort_config(mut self, sort_config: SortSpec) -> Self {
        self.sort_config = Some(sort_config);
        self
    }

    pub fn group_by(mut self, group_by: Option<String>) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The view with this patch applied; the original is untouched
    pub fn merged(&self, view: &ViewConfig) -> ViewConfig {
        let mut merged = view.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(fields) = &self.fields {
            merged.fields = fields.clone();
        }
        if let Some(filters) = &self.filters {
            merged.filters = filters.clone();
        }
        if let Some(sort_config) = &self.sort_config {
            merged.sort_config = sort_config.clone();
        }
        if let Some(group_by) = &self.group_by {
            merged.group_by = group_by.clone();
        }
        merged
    }
}
