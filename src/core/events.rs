//! Change events returned by state mutations
//!
//! Mutations never call back into the host. Each one returns an event that
//! describes what changed, and the caller decides whom to notify.
//!
//! # Usage
//!
//! ```rust,ignore
//! let event = state.set_sort(SortSpec::single("name", SortDirection::Asc));
//! let envelope = EventEnvelope::new(EngineEvent::List(event));
//! ui.notify(serde_json::to_value(&envelope)?);
//! ```

use crate::core::record::RecordKey;
use crate::query::filter::FilterSet;
use crate::query::sort::SortSpec;
use crate::selection::{SelectionChange, SelectionMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to the live configuration of one list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListEvent {
    /// A field was shown or hidden
    FieldVisibilityChanged { field: String, visible: bool },
    /// A field moved to another display position
    FieldMoved {
        field: String,
        from: usize,
        to: usize,
    },
    /// A field column was resized
    FieldResized { field: String, width: f64 },
    /// The filter set was replaced or edited
    FiltersChanged { filters: FilterSet },
    /// The sort spec changed
    SortChanged { sort: SortSpec },
    /// The group field changed
    GroupByChanged { group_by: Option<String> },
    /// A group bucket was expanded or collapsed
    GroupToggled { label: String, expanded: bool },
    /// The current page changed
    PageChanged { page: usize },
    /// The page size changed; the page was reset
    PageSizeChanged { page_size: usize, page: usize },
    /// Keys were added to or removed from the selection
    SelectionChanged { change: SelectionChange },
    /// The selection mode changed
    SelectionModeChanged {
        mode: SelectionMode,
        change: SelectionChange,
    },
    /// A saved view was applied to the list
    ViewApplied { view_id: String },
    /// The list no longer follows a saved view
    ViewDetached { view_id: String },
}

impl ListEvent {
    pub fn action(&self) -> &'static str {
        match self {
            ListEvent::FieldVisibilityChanged { .. } => "field_visibility_changed",
            ListEvent::FieldMoved { .. } => "field_moved",
            ListEvent::FieldResized { .. } => "field_resized",
            ListEvent::FiltersChanged { .. } => "filters_changed",
            ListEvent::SortChanged { .. } => "sort_changed",
            ListEvent::GroupByChanged { .. } => "group_by_changed",
            ListEvent::GroupToggled { .. } => "group_toggled",
            ListEvent::PageChanged { .. } => "page_changed",
            ListEvent::PageSizeChanged { .. } => "page_size_changed",
            ListEvent::SelectionChanged { .. } => "selection_changed",
            ListEvent::SelectionModeChanged { .. } => "selection_mode_changed",
            ListEvent::ViewApplied { .. } => "view_applied",
            ListEvent::ViewDetached { .. } => "view_detached",
        }
    }

    /// Keys whose selection state changed, if this is a selection event
    pub fn selection_change(&self) -> Option<&SelectionChange> {
        match self {
            ListEvent::SelectionChanged { change }
            | ListEvent::SelectionModeChanged { change, .. } => Some(change),
            _ => None,
        }
    }
}

/// Events related to saved views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A view was saved
    Created { view_id: String, name: String },
    /// A saved view was modified
    Updated { view_id: String, name: String },
    /// A saved view was deleted
    Removed { view_id: String },
}

impl ViewEvent {
    pub fn view_id(&self) -> &str {
        match self {
            ViewEvent::Created { view_id, .. }
            | ViewEvent::Updated { view_id, .. }
            | ViewEvent::Removed { view_id } => view_id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ViewEvent::Created { .. } => "created",
            ViewEvent::Updated { .. } => "updated",
            ViewEvent::Removed { .. } => "removed",
        }
    }
}

/// Top-level event that wraps list and view events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A list event
    List(ListEvent),
    /// A view event
    View(ViewEvent),
}

impl EngineEvent {
    pub fn event_kind(&self) -> &'static str {
        match self {
            EngineEvent::List(_) => "list",
            EngineEvent::View(_) => "view",
        }
    }

    /// Get the action name
    pub fn action(&self) -> &'static str {
        match self {
            EngineEvent::List(e) => e.action(),
            EngineEvent::View(e) => e.action(),
        }
    }

    /// Keys selected by this event
    pub fn selected_keys(&self) -> &[RecordKey] {
        match self {
            EngineEvent::List(e) => e
                .selection_change()
                .map(|change| change.added.as_slice())
                .unwrap_or_default(),
            EngineEvent::View(_) => &[],
        }
    }
}

impl From<ListEvent> for EngineEvent {
    fn from(event: ListEvent) -> Self {
        EngineEvent::List(event)
    }
}

impl From<ViewEvent> for EngineEvent {
    fn from(event: ViewEvent) -> Self {
        EngineEvent::View(event)
    }
}

/// Envelope wrapping an engine event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: EngineEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: impl Into<EngineEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event: event.into(),
        }
    }
}
