//! Record selection
//!
//! Selection is tracked by [`RecordKey`] so it survives re-sorting, filtering and
//! paging. Every operation takes the keys currently available (the filtered
//! set); keys outside it cannot be added.

use crate::core::error::ConfigWarning;
use crate::core::record::RecordKey;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How many records may be selected at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one record; selecting another replaces it
    Single,
    /// Selecting toggles, any number of records
    #[default]
    #[serde(alias = "multi")]
    Multiple,
}

/// Keys added to and removed from a selection by one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub added: Vec<RecordKey>,
    pub removed: Vec<RecordKey>,
}

impl SelectionChange {
    fn between(before: &IndexSet<RecordKey>, after: &IndexSet<RecordKey>) -> Self {
        Self {
            added: after.difference(before).cloned().collect(),
            removed: before.difference(after).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Selected keys, in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default)]
    mode: SelectionMode,
    #[serde(default)]
    selected_keys: IndexSet<RecordKey>,
}

impl SelectionState {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected_keys: IndexSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected_keys(&self) -> &IndexSet<RecordKey> {
        &self.selected_keys
    }

    pub fn is_selected(&self, key: &RecordKey) -> bool {
        self.selected_keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_keys.is_empty()
    }

    /// Whether every available key is selected (and there is at least one)
    pub fn is_all_selected(&self, available: &IndexSet<RecordKey>) -> bool {
        !available.is_empty() && available.iter().all(|key| self.is_selected(key))
    }

    fn replace(&mut self, next: IndexSet<RecordKey>) -> SelectionChange {
        let change = SelectionChange::between(&self.selected_keys, &next);
        self.selected_keys = next;
        change
    }

    /// Select or deselect one record
    ///
    /// Deselecting always works. Selecting a key that is not available is a
    /// no-op. In single mode selecting replaces the current key.
    pub fn toggle(&mut self, key: &RecordKey, available: &IndexSet<RecordKey>) -> SelectionChange {
        if self.is_selected(key) {
            let mut next = self.selected_keys.clone();
            next.shift_remove(key);
            return self.replace(next);
        }
        if !available.contains(key) {
            tracing::debug!(key = %key, "ignoring selection of unavailable key");
            return SelectionChange::default();
        }

        let mut next = match self.mode {
            SelectionMode::Single => IndexSet::new(),
            SelectionMode::Multiple => self.selected_keys.clone(),
        };
        next.insert(key.clone());
        self.replace(next)
    }

    /// Select exactly the available keys (the first one in single mode)
    pub fn select_all(&mut self, available: &IndexSet<RecordKey>) -> SelectionChange {
        let next = match self.mode {
            SelectionMode::Single => available.iter().take(1).cloned().collect(),
            SelectionMode::Multiple => available.clone(),
        };
        self.replace(next)
    }

    pub fn clear(&mut self) -> SelectionChange {
        self.replace(IndexSet::new())
    }

    /// Replace the selection
    ///
    /// Unavailable keys are dropped. More than one key in single mode keeps the
    /// first and reports a warning.
    pub fn set<I>(
        &mut self,
        keys: I,
        available: &IndexSet<RecordKey>,
    ) -> (SelectionChange, Option<ConfigWarning>)
    where
        I: IntoIterator<Item = RecordKey>,
    {
        let mut next: IndexSet<RecordKey> = keys
            .into_iter()
            .filter(|key| available.contains(key))
            .collect();

        let mut warning = None;
        if self.mode == SelectionMode::Single && next.len() > 1 {
            tracing::warn!(received = next.len(), "single selection given several keys, keeping the first");
            warning = Some(ConfigWarning::SelectionTruncated {
                received: next.len(),
            });
            next.truncate(1);
        }

        (self.replace(next), warning)
    }

    /// Drop selected keys that are no longer available
    pub fn prune(&mut self, available: &IndexSet<RecordKey>) -> SelectionChange {
        let next = self
            .selected_keys
            .iter()
            .filter(|key| available.contains(*key))
            .cloned()
            .collect();
        self.replace(next)
    }

    /// Switch mode; going to single keeps only the first selected key
    pub fn set_mode(&mut self, mode: SelectionMode) -> SelectionChange {
        self.mode = mode;
        let mut next = self.selected_keys.clone();
        if mode == SelectionMode::Single {
            next.truncate(1);
        }
        self.replace(next)
    }
}
