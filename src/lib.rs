//! # Rowset
//!
//! A generic list/table data engine: given a collection of records and a set of
//! field definitions, it derives what a list or table shows.
//!
//! ## Features
//!
//! - **Filtering**: Named predicates combined with AND, with text, equality and range operators
//! - **Multi-key Sorting**: Stable, null-trailing, type-aware comparison
//! - **Grouping**: Buckets in first-seen order with per-bucket expansion state
//! - **Pagination**: Clamped pages, item ranges and pager windows
//! - **Selection**: Single or multiple selection tracked by record key
//! - **Saved Views**: Named bundles of layout, filters, sort and grouping with JSON persistence
//! - **Configuration-Based**: Describe a list in YAML
//!
//! Configuration mistakes never fail a derivation: they are recovered from and
//! reported as [`ConfigWarning`](core::error::ConfigWarning) values.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rowset::prelude::*;
//!
//! let records = records_from_json(json!([
//!     {"id": 1, "name": "Bob", "age": null},
//!     {"id": 2, "name": "Amy", "age": 30},
//! ]))?;
//!
//! let mut state = ListState::new(vec![
//!     FieldDefinition::text("name", "Name"),
//!     FieldDefinition::number("age", "Age"),
//! ]);
//! state.set_sort(SortSpec::single("age", SortDirection::Desc));
//! state.set_filter("adults", FilterPredicate::greater_than("age", 17));
//!
//! let view = derive(&records, &state);
//! assert_eq!(view.total_items, 1);
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod query;
pub mod selection;
pub mod views;

/// Re-exports of commonly used types and functions
pub mod prelude {
    // === Records and fields ===
    pub use crate::core::{
        compare::{compare, compare_field},
        field::{DataType, FieldDefinition, FieldValue},
        record::{DEFAULT_KEY_FIELD, Record, RecordKey, records_from_json},
    };

    // === Errors and events ===
    pub use crate::core::{
        error::{ConfigError, ConfigWarning, FieldUsage, RowsetError, ViewError},
        events::{EngineEvent, EventEnvelope, ListEvent, ViewEvent},
    };

    // === Pipeline stages ===
    pub use crate::query::{
        FilterOperator, FilterPredicate, FilterSet, GroupExpansion, PageLink, PaginationMeta,
        PaginationState, QueryParams, SortDirection, SortKey, SortSpec, UNGROUPED_LABEL, filter,
        group, page_links, paginate, sort,
    };

    // === Selection ===
    pub use crate::selection::{SelectionChange, SelectionMode, SelectionState};

    // === Views ===
    pub use crate::views::{ViewConfig, ViewField, ViewPatch, ViewStore};

    // === Engine ===
    pub use crate::engine::{
        DerivedView, GroupBucket, ListState, available_keys, derive, prune_selection, refresh,
    };

    // === Config ===
    pub use crate::config::ListConfig;

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::json;
}
