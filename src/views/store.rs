//! In-memory store of saved views

use crate::core::error::{RowsetError, ViewError};
use crate::core::events::{ListEvent, ViewEvent};
use crate::engine::state::ListState;
use crate::views::config::{ViewConfig, ViewPatch};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Saved views in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewStore {
    views: IndexMap<String, ViewConfig>,
}

fn generate_view_id() -> String {
    format!("view-{}", Uuid::new_v4())
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new view
    ///
    /// An empty id is replaced with a generated one. The view is validated and
    /// an id already in use is rejected.
    pub fn create(&mut self, mut view: ViewConfig) -> Result<(ViewConfig, ViewEvent), ViewError> {
        if view.id.trim().is_empty() {
            view.id = generate_view_id();
        }
        if self.views.contains_key(&view.id) {
            return Err(ViewError::AlreadyExists { id: view.id });
        }
        view.validate()?;

        tracing::info!(view_id = %view.id, name = %view.name, "view created");
        let event = ViewEvent::Created {
            view_id: view.id.clone(),
            name: view.name.clone(),
        };
        self.views.insert(view.id.clone(), view.clone());
        Ok((view, event))
    }

    /// Apply a partial update
    ///
    /// The merged view is validated before it replaces the stored one, so a
    /// rejected update leaves the store unchanged.
    pub fn update(&mut self, id: &str, patch: ViewPatch) -> Result<ViewEvent, ViewError> {
        let current = self.views.get(id).ok_or_else(|| ViewError::NotFound {
            id: id.to_string(),
        })?;
        let merged = patch.merged(current);
        merged.validate()?;

        tracing::info!(view_id = %id, "view updated");
        let event = ViewEvent::Updated {
            view_id: id.to_string(),
            name: merged.name.clone(),
        };
        self.views.insert(id.to_string(), merged);
        Ok(event)
    }

    /// Delete a view
    ///
    /// The live configuration keeps whatever the view set; only the active
    /// view marker is cleared if it pointed here.
    pub fn remove(&mut self, id: &str, state: &mut ListState) -> Option<(ViewConfig, ViewEvent, Option<ListEvent>)> {
        let view = self.views.shift_remove(id)?;
        tracing::info!(view_id = %id, "view removed");
        let detached = state.detach_view(id);
        let event = ViewEvent::Removed {
            view_id: id.to_string(),
        };
        Some((view, event, detached))
    }

    /// Apply a stored view to the live state
    pub fn apply(&self, id: &str, state: &mut ListState) -> Result<ListEvent, ViewError> {
        let view = self.get(id).ok_or_else(|| ViewError::NotFound {
            id: id.to_string(),
        })?;
        tracing::debug!(view_id = %id, "applying view");
        Ok(state.apply_view(view))
    }

    /// Build a view from the live configuration, without storing it
    ///
    /// The returned view has no id; pass it to [`ViewStore::create`] to save a
    /// new view, or turn it into a [`ViewPatch`] to overwrite an existing one.
    pub fn capture(name: impl Into<String>, state: &ListState) -> ViewConfig {
        ViewConfig {
            id: String::new(),
            name: name.into(),
            fields: state.view_fields(),
            filters: state.filters().clone(),
            sort_config: state.sort().clone(),
            group_by: state.group_by().map(str::to_string),
        }
    }

    /// Patch replacing a view's settings with the live configuration
    pub fn capture_patch(state: &ListState) -> ViewPatch {
        ViewPatch::new()
            .fields(state.view_fields())
            .filters(state.filters().clone())
            .sort_config(state.sort().clone())
            .group_by(state.group_by().map(str::to_string))
    }

    pub fn get(&self, id: &str) -> Option<&ViewConfig> {
        self.views.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.views.contains_key(id)
    }

    /// Views in creation order
    pub fn list(&self) -> impl Iterator<Item = &ViewConfig> {
        self.views.values()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Serialize every view as a JSON array
    pub fn to_json(&self) -> Result<String, RowsetError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a store from a JSON array of views
    ///
    /// Every view goes through [`ViewStore::create`], so invalid views and
    /// duplicate ids are rejected.
    pub fn from_json(json: &str) -> Result<Self, RowsetError> {
        let views: Vec<ViewConfig> = serde_json::from_str(json)?;
        Ok(Self::from_views(views)?)
    }

    pub fn from_views<I>(views: I) -> Result<Self, ViewError>
    where
        I: IntoIterator<Item = ViewConfig>,
    {
        let mut store = Self::new();
        for view in views {
            store.create(view)?;
        }
        Ok(store)
    }
}

impl Serialize for ViewStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.views.values())
    }
}

impl<'de> Deserialize<'de> for ViewStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let views = Vec::<ViewConfig>::deserialize(deserializer)?;
        Self::from_views(views).map_err(serde::de::Error::custom)
    }
}
