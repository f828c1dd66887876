//! Derivation of the displayed list from records and state
//!
//! ```text
//! records ──▶ filter ──▶ sort ──┬──▶ paginate ──▶ items
//!                               └──▶ group ─────▶ groups
//! ```
//!
//! Groups cover the whole filtered set, not just the current page. Every
//! derivation recomputes from scratch.

use crate::core::error::{ConfigWarning, FieldUsage};
use crate::core::events::ListEvent;
use crate::core::field::FieldDefinition;
use crate::core::record::{Record, RecordKey, collect_keys};
use crate::engine::state::ListState;
use crate::query::filter::filter;
use crate::query::group::group;
use crate::query::pagination::PaginationMeta;
use crate::query::sort::sort;
use indexmap::IndexSet;
use serde::Serialize;

/// One group of the derived view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBucket<'a> {
    pub label: String,
    /// Collapsed buckets still carry all their records
    pub expanded: bool,
    pub records: Vec<&'a Record>,
}

impl GroupBucket<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What a list shows for one state over one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView<'a> {
    /// Records on the current page, filtered and sorted
    pub items: Vec<&'a Record>,

    /// Buckets over the whole filtered set when a group field is set
    pub groups: Option<Vec<GroupBucket<'a>>>,

    pub total_items: usize,
    pub total_pages: usize,

    /// Current page after clamping
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub has_prev: bool,

    /// 1-based range of the items shown
    pub first_item: Option<usize>,
    pub last_item: Option<usize>,

    /// Keys of every filtered record, in display order
    pub visible_keys: IndexSet<RecordKey>,

    /// Selected keys among the visible ones, in selection order
    pub selected_keys: Vec<RecordKey>,

    /// Whether every visible record is selected
    pub all_selected: bool,

    /// Visible field definitions in display order
    pub visible_fields: Vec<FieldDefinition>,

    /// Configuration problems recovered from during derivation
    pub warnings: Vec<ConfigWarning>,
}

/// Run the pipeline
///
/// Never fails: unknown fields and operators, out-of-range pages and duplicate
/// keys are recovered from and listed in [`DerivedView::warnings`].
pub fn derive<'a>(records: &'a [Record], state: &ListState) -> DerivedView<'a> {
    let mut warnings = check_references(state);

    let filtered = filter(records, state.filters());
    let sorted = sort(filtered, state.sort());

    let (visible_keys, key_warnings) = collect_keys(sorted.iter().copied(), state.key_field());
    warnings.extend(key_warnings);

    let pagination = state.pagination();
    let (meta, page_warnings) =
        PaginationMeta::new(pagination.page, pagination.page_size, sorted.len());
    warnings.extend(page_warnings);

    let items = sorted[meta.range()].to_vec();

    let groups = state.group_by().map(|field| {
        group(sorted.iter().copied(), Some(field))
            .into_buckets()
            .into_iter()
            .map(|(label, records)| GroupBucket {
                expanded: state.group_expansion().is_expanded(&label),
                label,
                records,
            })
            .collect()
    });

    let selection = state.selection();
    let selected_keys = selection
        .selected_keys()
        .iter()
        .filter(|key| visible_keys.contains(*key))
        .cloned()
        .collect();

    tracing::debug!(
        total = records.len(),
        filtered = sorted.len(),
        page = meta.page,
        warnings = warnings.len(),
        "derived list view"
    );

    DerivedView {
        items,
        groups,
        total_items: meta.total_items,
        total_pages: meta.total_pages,
        page: meta.page,
        page_size: meta.page_size,
        has_next: meta.has_next,
        has_prev: meta.has_prev,
        first_item: meta.first_item,
        last_item: meta.last_item,
        all_selected: selection.is_all_selected(&visible_keys),
        visible_keys,
        selected_keys,
        visible_fields: state.visible_fields().cloned().collect(),
        warnings,
    }
}

/// Keys of the records that pass the current filters
pub fn available_keys(records: &[Record], state: &ListState) -> IndexSet<RecordKey> {
    collect_keys(filter(records, state.filters()), state.key_field()).0
}

/// Drop selected keys that the current filters hide
///
/// Returns the selection event when anything was removed.
pub fn prune_selection(records: &[Record], state: &mut ListState) -> Option<ListEvent> {
    let available = available_keys(records, state);
    let change = state.selection_mut().prune(&available);
    if change.is_empty() {
        None
    } else {
        Some(ListEvent::SelectionChanged { change })
    }
}

/// Prune the stored selection, then derive
pub fn refresh<'a>(records: &'a [Record], state: &mut ListState) -> (DerivedView<'a>, Option<ListEvent>) {
    let event = prune_selection(records, state);
    (derive(records, state), event)
}

/// Unknown fields and operators referenced by the state
///
/// Field ids are only checked when the state defines fields at all.
fn check_references(state: &ListState) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    for (filter_id, operator) in state.filters().unknown_operators() {
        tracing::warn!(filter_id, operator, "unknown filter operator, filter ignored");
        warnings.push(ConfigWarning::UnknownOperator {
            filter_id: filter_id.to_string(),
            operator: operator.to_string(),
        });
    }

    if state.fields().is_empty() {
        return warnings;
    }

    let references = state
        .sort()
        .fields()
        .map(|field| (FieldUsage::Sort, field))
        .chain(state.filters().fields().map(|field| (FieldUsage::Filter, field)))
        .chain(state.group_by().map(|field| (FieldUsage::Group, field)));

    for (usage, field) in references {
        if !state.has_field(field) {
            tracing::warn!(?usage, field, "reference to unknown field");
            warnings.push(ConfigWarning::UnknownField {
                usage,
                field: field.to_string(),
            });
        }
    }

    warnings
}
