//! Declarative list configuration
//!
//! A list can be described in YAML and turned into its initial [`ListState`]
//! and [`ViewStore`]:
//!
//! ```yaml
//! key_field: id
//! fields:
//!   - id: name
//!     display_name: Name
//!   - id: age
//!     display_name: Age
//!     data_type: number
//! default_sort:
//!   - field: name
//!     direction: asc
//! page_size: 25
//! selection_mode: multiple
//! views:
//!   - id: adults
//!     name: Adults
//!     filters:
//!       f1: { field: age, operator: greaterThan, value: 17 }
//! default_view: adults
//! ```

use crate::core::error::{ConfigError, RowsetError};
use crate::core::field::FieldDefinition;
use crate::core::record::DEFAULT_KEY_FIELD;
use crate::engine::state::ListState;
use crate::query::filter::FilterSet;
use crate::query::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, PaginationState};
use crate::query::sort::SortSpec;
use crate::selection::SelectionMode;
use crate::views::config::ViewConfig;
use crate::views::store::ViewStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration of one list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Field holding the record key
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Field definitions; display order follows `order`, then position
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    #[serde(default)]
    pub default_sort: SortSpec,

    #[serde(default)]
    pub default_filters: FilterSet,

    #[serde(default)]
    pub default_group_by: Option<String>,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    #[serde(default)]
    pub selection_mode: SelectionMode,

    /// Whether group buckets start expanded
    #[serde(default = "default_groups_expanded")]
    pub default_groups_expanded: bool,

    /// Saved views available at start-up
    #[serde(default)]
    pub views: Vec<ViewConfig>,

    /// View applied at start-up
    #[serde(default)]
    pub default_view: Option<String>,
}

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
    DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
}

fn default_groups_expanded() -> bool {
    true
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            fields: Vec::new(),
            default_sort: SortSpec::default(),
            default_filters: FilterSet::default(),
            default_group_by: None,
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            selection_mode: SelectionMode::default(),
            default_groups_expanded: default_groups_expanded(),
            views: Vec::new(),
            default_view: None,
        }
    }
}

impl ListConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading list config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "key_field".to_string(),
                value: self.key_field.clone(),
                message: "key field must not be blank".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size".to_string(),
                value: self.page_size.to_string(),
                message: "page size must be at least 1".to_string(),
            });
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "page_size_options".to_string(),
                value: format!("{:?}", self.page_size_options),
                message: "page size options must be at least 1".to_string(),
            });
        }
        if let Some(id) = &self.default_view {
            if !self.views.iter().any(|view| &view.id == id) {
                return Err(ConfigError::UnknownDefaultView { id: id.clone() });
            }
        }
        Ok(())
    }

    /// Build the initial live state and view store
    ///
    /// The default view, if any, is applied on top of the default sort,
    /// filters and grouping.
    pub fn into_state(self) -> Result<(ListState, ViewStore), RowsetError> {
        self.validate()?;

        let mut state = ListState::new(self.fields)
            .with_key_field(self.key_field)
            .with_selection_mode(self.selection_mode)
            .with_pagination(PaginationState::new(1, self.page_size))
            .with_page_size_options(self.page_size_options)
            .with_group_expansion(self.default_groups_expanded)
            .with_filters(self.default_filters)
            .with_sort(self.default_sort)
            .with_group_by(self.default_group_by);

        let store = ViewStore::from_views(self.views)?;
        if let Some(id) = &self.default_view {
            store.apply(id, &mut state)?;
        }

        tracing::info!(
            fields = state.fields().len(),
            views = store.len(),
            default_view = ?self.default_view,
            "list configuration loaded"
        );
        Ok((state, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sort::{SortDirection, SortKey};

    const YAML: &str = r#"
key_field: code
fields:
  - id: name
    display_name: Name
  - id: age
    name: Age
    type: number
    order: -1
default_sort:
  - field: name
page_size: 10
selection_mode: single
default_groups_expanded: false
views:
  - id: adults
    name: Adults
    filters:
      f1: { field: age, operator: greaterThan, value: 17 }
    sortConfig:
      - field: age
        direction: desc
"#;

    #[test]
    fn test_defaults() {
        let config = ListConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ListConfig::default());
        assert_eq!(config.page_size, 25);
        assert_eq!(config.page_size_options, vec![10, 25, 50, 100]);
        assert_eq!(config.selection_mode, SelectionMode::Multiple);
        assert!(config.default_groups_expanded);
    }

    #[test]
    fn test_yaml_parsing() {
        let config = ListConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.key_field, "code");
        assert_eq!(config.fields[1].display_name, "Age");
        assert_eq!(config.default_sort.primary(), Some(&SortKey::asc("name")));
        assert_eq!(config.views[0].filters.len(), 1);
    }

    #[test]
    fn test_into_state() {
        let (state, store) = ListConfig::from_yaml_str(YAML).unwrap().into_state().unwrap();

        assert_eq!(state.key_field(), "code");
        assert_eq!(state.fields()[0].id, "age");
        assert_eq!(state.pagination(), PaginationState::new(1, 10));
        assert_eq!(state.selection().mode(), SelectionMode::Single);
        assert!(!state.group_expansion().is_expanded("any"));
        assert_eq!(state.active_view(), None);
        assert!(store.contains("adults"));
    }

    #[test]
    fn test_default_view_is_applied() {
        let mut config = ListConfig::from_yaml_str(YAML).unwrap();
        config.default_view = Some("adults".to_string());

        let (state, _) = config.into_state().unwrap();

        assert_eq!(state.active_view(), Some("adults"));
        assert_eq!(state.sort(), &SortSpec::single("age", SortDirection::Desc));
        assert_eq!(state.filters().len(), 1);
    }

    #[test]
    fn test_unknown_default_view_is_rejected() {
        let err = ListConfig::from_yaml_str("default_view: nope").unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert_eq!(config_err.error_code(), "UNKNOWN_DEFAULT_VIEW");
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = ListConfig::from_yaml_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_parse_error() {
        let err = ListConfig::from_yaml_str("fields: [").unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert_eq!(config_err.error_code(), "CONFIG_PARSE_ERROR");
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ListConfig::from_yaml_str(YAML).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ListConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
