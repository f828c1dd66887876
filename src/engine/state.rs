//! Live state of one list instance

use crate::core::error::ConfigWarning;
use crate::core::events::ListEvent;
use crate::core::field::{FieldDefinition, MIN_FIELD_WIDTH};
use crate::core::record::{DEFAULT_KEY_FIELD, RecordKey};
use crate::query::filter::{FilterPredicate, FilterSet};
use crate::query::group::GroupExpansion;
use crate::query::pagination::{DEFAULT_PAGE_SIZE_OPTIONS, PaginationState};
use crate::query::sort::SortSpec;
use crate::selection::{SelectionMode, SelectionState};
use crate::views::config::{ViewConfig, ViewField};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Everything the pipeline needs besides the records
///
/// Fields are kept in display order. Each mutation returns the [`ListEvent`]
/// describing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    #[serde(default = "default_key_field")]
    key_field: String,

    #[serde(default)]
    fields: Vec<FieldDefinition>,

    #[serde(default)]
    filters: FilterSet,

    #[serde(default)]
    sort: SortSpec,

    #[serde(default)]
    group_by: Option<String>,

    #[serde(default)]
    group_expansion: GroupExpansion,

    #[serde(default)]
    pagination: PaginationState,

    #[serde(default = "default_page_size_options")]
    page_size_options: Vec<usize>,

    #[serde(default)]
    selection: SelectionState,

    #[serde(default)]
    active_view: Option<String>,
}

fn default_key_field() -> String {
    DEFAULT_KEY_FIELD.to_string()
}

fn default_page_size_options() -> Vec<usize> {
    DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ListState {
    /// State over the given fields, sorted by their `order`
    pub fn new(mut fields: Vec<FieldDefinition>) -> Self {
        fields.sort_by_key(|field| field.order);
        let mut state = Self {
            key_field: default_key_field(),
            fields,
            filters: FilterSet::default(),
            sort: SortSpec::default(),
            group_by: None,
            group_expansion: GroupExpansion::default(),
            pagination: PaginationState::default(),
            page_size_options: default_page_size_options(),
            selection: SelectionState::default(),
            active_view: None,
        };
        state.renumber_fields();
        state
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection = SelectionState::new(mode);
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationState) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn with_group_expansion(mut self, default_expanded: bool) -> Self {
        self.group_expansion = GroupExpansion::new(default_expanded);
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_group_by(mut self, group_by: Option<String>) -> Self {
        self.group_by = group_by;
        self
    }

    // === Accessors ===

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// All fields in display order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Visible fields in display order
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.visible)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn group_expansion(&self) -> &GroupExpansion {
        &self.group_expansion
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Id of the saved view last applied, if still stored
    pub fn active_view(&self) -> Option<&str> {
        self.active_view.as_deref()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    fn renumber_fields(&mut self) {
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.order = index as i32;
        }
    }

    // === Fields ===

    /// Show or hide a field; `None` for an unknown field
    pub fn set_field_visible(&mut self, id: &str, visible: bool) -> Option<ListEvent> {
        let field = self.fields.iter_mut().find(|field| field.id == id)?;
        field.visible = visible;
        Some(ListEvent::FieldVisibilityChanged {
            field: id.to_string(),
            visible,
        })
    }

    pub fn toggle_field_visibility(&mut self, id: &str) -> Option<ListEvent> {
        let visible = !self.field(id)?.visible;
        self.set_field_visible(id, visible)
    }

    /// Move a field to another display position (clamped to the end)
    pub fn move_field(&mut self, id: &str, to: usize) -> Option<ListEvent> {
        let from = self.position(id)?;
        let to = to.min(self.fields.len() - 1);
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        self.renumber_fields();
        Some(ListEvent::FieldMoved {
            field: id.to_string(),
            from,
            to,
        })
    }

    /// Swap a field with its predecessor; `None` if it is first or unknown
    pub fn move_field_up(&mut self, id: &str) -> Option<ListEvent> {
        let from = self.position(id)?;
        let to = from.checked_sub(1)?;
        self.move_field(id, to)
    }

    /// Swap a field with its successor; `None` if it is last or unknown
    pub fn move_field_down(&mut self, id: &str) -> Option<ListEvent> {
        let from = self.position(id)?;
        if from + 1 >= self.fields.len() {
            return None;
        }
        self.move_field(id, from + 1)
    }

    /// Set a column width, never below [`MIN_FIELD_WIDTH`]
    pub fn resize_field(&mut self, id: &str, width: f64) -> Option<ListEvent> {
        let width = if width.is_finite() {
            width.max(MIN_FIELD_WIDTH)
        } else {
            MIN_FIELD_WIDTH
        };
        let field = self.fields.iter_mut().find(|field| field.id == id)?;
        field.width = Some(width);
        Some(ListEvent::FieldResized {
            field: id.to_string(),
            width,
        })
    }

    // === Filters ===

    pub fn set_filters(&mut self, filters: FilterSet) -> ListEvent {
        self.filters = filters;
        self.filters_changed()
    }

    /// Add or replace one predicate
    pub fn set_filter(&mut self, id: impl Into<String>, predicate: FilterPredicate) -> ListEvent {
        self.filters.insert(id, predicate);
        self.filters_changed()
    }

    pub fn remove_filter(&mut self, id: &str) -> ListEvent {
        self.filters.remove(id);
        self.filters_changed()
    }

    pub fn clear_filters(&mut self) -> ListEvent {
        self.filters.clear();
        self.filters_changed()
    }

    fn filters_changed(&self) -> ListEvent {
        ListEvent::FiltersChanged {
            filters: self.filters.clone(),
        }
    }

    // === Sort ===

    pub fn set_sort(&mut self, sort: SortSpec) -> ListEvent {
        self.sort = sort;
        ListEvent::SortChanged {
            sort: self.sort.clone(),
        }
    }

    /// Header click on `field`
    pub fn toggle_sort(&mut self, field: &str) -> ListEvent {
        let sort = self.sort.toggled(field);
        self.set_sort(sort)
    }

    // === Grouping ===

    /// Change the group field; expansion toggles are forgotten
    pub fn set_group_by(&mut self, group_by: Option<String>) -> ListEvent {
        if self.group_by != group_by {
            self.group_expansion.reset();
        }
        self.group_by = group_by;
        ListEvent::GroupByChanged {
            group_by: self.group_by.clone(),
        }
    }

    pub fn toggle_group(&mut self, label: &str) -> ListEvent {
        let expanded = self.group_expansion.toggle(label);
        ListEvent::GroupToggled {
            label: label.to_string(),
            expanded,
        }
    }

    // === Pagination ===

    /// Go to a page; the pipeline clamps it against the current item count
    pub fn set_page(&mut self, page: usize) -> ListEvent {
        self.pagination.page = page;
        ListEvent::PageChanged { page }
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> ListEvent {
        self.pagination = self.pagination.with_page_size(page_size);
        ListEvent::PageSizeChanged {
            page_size,
            page: self.pagination.page,
        }
    }

    // === Selection ===

    pub fn toggle_selection(&mut self, key: &RecordKey, available: &IndexSet<RecordKey>) -> ListEvent {
        ListEvent::SelectionChanged {
            change: self.selection.toggle(key, available),
        }
    }

    pub fn select_all(&mut self, available: &IndexSet<RecordKey>) -> ListEvent {
        ListEvent::SelectionChanged {
            change: self.selection.select_all(available),
        }
    }

    pub fn clear_selection(&mut self) -> ListEvent {
        ListEvent::SelectionChanged {
            change: self.selection.clear(),
        }
    }

    pub fn set_selection<I>(
        &mut self,
        keys: I,
        available: &IndexSet<RecordKey>,
    ) -> (ListEvent, Option<ConfigWarning>)
    where
        I: IntoIterator<Item = RecordKey>,
    {
        let (change, warning) = self.selection.set(keys, available);
        (ListEvent::SelectionChanged { change }, warning)
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> ListEvent {
        let change = self.selection.set_mode(mode);
        ListEvent::SelectionModeChanged { mode, change }
    }

    // === Views ===

    /// Swap a view's layout, filters, sort and grouping in
    ///
    /// Pagination and selection are left alone. View entries for unknown
    /// fields are skipped; known fields the view does not mention keep their
    /// settings and follow the mentioned ones in display order.
    pub fn apply_view(&mut self, view: &ViewConfig) -> ListEvent {
        let mut leading = Vec::with_capacity(self.fields.len());
        for entry in &view.fields {
            match self.position(&entry.id) {
                Some(index) => {
                    let mut field = self.fields.remove(index);
                    field.visible = entry.visible;
                    field.width = entry.width;
                    leading.push(field);
                }
                None => {
                    tracing::debug!(view_id = %view.id, field = %entry.id, "view names unknown field, skipping");
                }
            }
        }
        leading.append(&mut self.fields);
        self.fields = leading;
        self.renumber_fields();

        self.filters = view.filters.clone();
        self.sort = view.sort_config.clone();
        if self.group_by != view.group_by {
            self.group_expansion.reset();
        }
        self.group_by = view.group_by.clone();
        self.active_view = Some(view.id.clone());

        ListEvent::ViewApplied {
            view_id: view.id.clone(),
        }
    }

    /// Stop tracking `view_id` as the active view
    pub fn detach_view(&mut self, view_id: &str) -> Option<ListEvent> {
        if self.active_view.as_deref() != Some(view_id) {
            return None;
        }
        self.active_view = None;
        Some(ListEvent::ViewDetached {
            view_id: view_id.to_string(),
        })
    }

    /// Current layout as view field entries
    pub fn view_fields(&self) -> Vec<ViewField> {
        self.fields
            .iter()
            .map(|field| ViewField {
                id: field.id.clone(),
                visible: field.visible,
                width: field.width,
            })
            .collect()
    }
}
