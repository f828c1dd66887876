//! Property-based tests for the derivation pipeline.
//!
//! These tests check the laws every list derivation must satisfy, whatever
//! mix of values a field holds:
//! - Sorting is stable, total and keeps nulls last in both directions
//! - Filtering is idempotent and never invents records
//! - Pages cover the filtered sequence exactly once
//! - Grouping partitions its input

use indexmap::IndexSet;
use proptest::prelude::*;
use rowset::prelude::*;
use serde_json::Value;
use std::cmp::Ordering;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Null),
        (-50i64..50).prop_map(FieldValue::Integer),
        (-50.0f64..50.0).prop_map(FieldValue::Float),
        any::<bool>().prop_map(FieldValue::Boolean),
        prop::string::string_regex("[a-cA-C ]{0,3}")
            .unwrap()
            .prop_map(FieldValue::String),
        prop::sample::select(vec!["2024-01-15", "2023-12-31T23:00:00Z", "2024-01-15 08:30:00"])
            .prop_map(|s| FieldValue::String(s.to_string())),
    ]
}

/// Records keyed by position holding one generated value under `v`
fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(value_strategy(), 0..40).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Record::new().with("id", index as i64).with("v", value))
            .collect()
    })
}

fn predicate_strategy() -> impl Strategy<Value = FilterPredicate> {
    let operator = prop::sample::select(vec![
        "equals",
        "contains",
        "startsWith",
        "endsWith",
        "greaterThan",
        "lessThan",
    ]);
    let operand = prop_oneof![
        (-50i64..50).prop_map(Value::from),
        prop::string::string_regex("[a-c]{0,2}").unwrap().prop_map(Value::from),
    ];
    (operator, operand)
        .prop_map(|(operator, operand)| FilterPredicate::new("v", FilterOperator::parse(operator), operand))
}

fn direction_strategy() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

fn ids(records: &[&Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|record| record.get("id").as_integer())
        .collect()
}

// =============================================================================
// SORT PROPERTY TESTS
// =============================================================================

mod sort_properties {
    use super::*;

    proptest! {
        /// An empty spec returns the input order unchanged
        #[test]
        fn empty_spec_keeps_input_order(records in records_strategy()) {
            let sorted = sort(&records, &SortSpec::default());
            let expected: Vec<i64> = (0..records.len() as i64).collect();
            prop_assert_eq!(ids(&sorted), expected);
        }

        /// Without ties or nulls, descending is the reverse of ascending
        #[test]
        fn desc_reverses_asc_without_ties(
            values in prop::collection::hash_set(-1000i64..1000, 0..40)
        ) {
            let records: Vec<Record> = values
                .into_iter()
                .enumerate()
                .map(|(index, v)| Record::new().with("id", index as i64).with("v", v))
                .collect();

            let asc = ids(&sort(&records, &SortSpec::single("v", SortDirection::Asc)));
            let mut desc = ids(&sort(&records, &SortSpec::single("v", SortDirection::Desc)));
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }

        /// Nulls form a trailing block, in input order, for either direction
        #[test]
        fn nulls_trail_in_both_directions(
            records in records_strategy(),
            direction in direction_strategy(),
        ) {
            let sorted = sort(&records, &SortSpec::single("v", direction));
            let first_null = sorted
                .iter()
                .position(|record| record.get("v").is_null())
                .unwrap_or(sorted.len());

            prop_assert!(sorted[first_null..].iter().all(|record| record.get("v").is_null()));
            let null_ids = ids(&sorted[first_null..]);
            let mut in_input_order = null_ids.clone();
            in_input_order.sort_unstable();
            prop_assert_eq!(null_ids, in_input_order);
        }

        /// Output is a permutation whose neighbours never compare out of order
        #[test]
        fn sorted_output_is_ordered_permutation(
            records in records_strategy(),
            direction in direction_strategy(),
        ) {
            let spec = SortSpec::single("v", direction);
            let sorted = sort(&records, &spec);

            for pair in sorted.windows(2) {
                prop_assert_ne!(spec.compare(pair[0], pair[1]), Ordering::Greater);
            }
            let mut seen = ids(&sorted);
            seen.sort_unstable();
            let expected: Vec<i64> = (0..records.len() as i64).collect();
            prop_assert_eq!(seen, expected);
        }

        /// Value comparison is antisymmetric for any mix of types
        #[test]
        fn compare_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        /// Value comparison is transitive for any mix of types
        #[test]
        fn compare_is_transitive(
            a in value_strategy(),
            b in value_strategy(),
            c in value_strategy(),
        ) {
            let mut values = [a, b, c];
            values.sort_by(compare);
            for (i, j) in [(0, 1), (1, 2), (0, 2)] {
                prop_assert_ne!(compare(&values[i], &values[j]), Ordering::Greater);
            }
        }
    }
}

// =============================================================================
// FILTER PROPERTY TESTS
// =============================================================================

mod filter_properties {
    use super::*;

    proptest! {
        /// Filtering twice with the same set equals filtering once
        #[test]
        fn filter_is_idempotent(
            records in records_strategy(),
            predicates in prop::collection::vec(predicate_strategy(), 0..3),
        ) {
            let filters: FilterSet = predicates
                .into_iter()
                .enumerate()
                .map(|(index, predicate)| (format!("f{}", index), predicate))
                .collect();

            let once = filter(&records, &filters);
            let twice = filter(once.iter().copied(), &filters);
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        /// Filtered records are an ordered subsequence of the input
        #[test]
        fn filter_keeps_input_order(
            records in records_strategy(),
            predicate in predicate_strategy(),
        ) {
            let filters = FilterSet::new().with("only", predicate);
            let kept = ids(&filter(&records, &filters));
            prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
        }

        /// Null never satisfies a known operator
        #[test]
        fn null_fails_every_known_operator(predicate in predicate_strategy()) {
            let record = Record::new().with("id", 0).with("v", FieldValue::Null);
            prop_assert!(!predicate.matches(&record));
        }
    }
}

// =============================================================================
// PAGINATION PROPERTY TESTS
// =============================================================================

mod pagination_properties {
    use super::*;

    proptest! {
        /// Concatenating pages 1..=total_pages reproduces the sequence
        #[test]
        fn pages_cover_sequence_exactly_once(
            items in prop::collection::vec(any::<u16>(), 0..60),
            page_size in 1usize..12,
        ) {
            let total_pages = paginate(&items, 1, page_size).pagination.total_pages;
            prop_assert!(total_pages >= 1);

            let mut joined = Vec::new();
            for page in 1..=total_pages {
                let slice = paginate(&items, page, page_size);
                prop_assert!(slice.items.len() <= page_size);
                prop_assert!(slice.warnings.is_empty());
                joined.extend(slice.items);
            }
            prop_assert_eq!(joined, items);
        }

        /// Any requested page is clamped into range
        #[test]
        fn requested_page_is_clamped(
            total in 0usize..200,
            page_size in 1usize..30,
            page in 0usize..50,
        ) {
            let (meta, _) = PaginationMeta::new(page, page_size, total);
            prop_assert!(meta.page >= 1 && meta.page <= meta.total_pages);
            prop_assert!(meta.range().end <= total);
        }
    }
}

// =============================================================================
// SELECTION PROPERTY TESTS
// =============================================================================

mod selection_properties {
    use super::*;

    fn available(count: usize) -> IndexSet<RecordKey> {
        (0..count as i64).map(RecordKey::from).collect()
    }

    proptest! {
        /// Toggling a key twice restores the selection in multiple mode
        #[test]
        fn toggle_twice_restores_selection(
            preselected in prop::collection::vec(0i64..20, 0..10),
            key in 0i64..20,
        ) {
            let available = available(20);
            let mut selection = SelectionState::new(SelectionMode::Multiple);
            for id in preselected {
                if !selection.is_selected(&RecordKey::from(id)) {
                    selection.toggle(&RecordKey::from(id), &available);
                }
            }
            let before: std::collections::HashSet<RecordKey> =
                selection.selected_keys().iter().cloned().collect();

            let key = RecordKey::from(key);
            selection.toggle(&key, &available);
            selection.toggle(&key, &available);

            let after: std::collections::HashSet<RecordKey> =
                selection.selected_keys().iter().cloned().collect();
            prop_assert_eq!(before, after);
        }

        /// In single mode toggling twice from an empty selection is a no-op
        #[test]
        fn single_mode_toggle_twice_from_empty(key in 0i64..20) {
            let available = available(20);
            let mut selection = SelectionState::new(SelectionMode::Single);
            let key = RecordKey::from(key);

            selection.toggle(&key, &available);
            prop_assert_eq!(selection.len(), 1);
            selection.toggle(&key, &available);
            prop_assert!(selection.is_empty());
        }

        /// Pruning leaves only available keys
        #[test]
        fn prune_keeps_only_available(
            selected in prop::collection::vec(0i64..30, 0..15),
            remaining in 0usize..30,
        ) {
            let mut selection = SelectionState::new(SelectionMode::Multiple);
            let (_, _) = selection.set(selected.into_iter().map(RecordKey::from), &available(30));

            let available = available(remaining);
            selection.prune(&available);
            prop_assert!(selection.selected_keys().iter().all(|key| available.contains(key)));
        }
    }
}

// =============================================================================
// GROUP PROPERTY TESTS
// =============================================================================

mod group_properties {
    use super::*;

    proptest! {
        /// Every record lands in exactly one bucket, labelled by its value
        #[test]
        fn buckets_partition_the_input(records in records_strategy()) {
            let grouping = group(&records, Some("v"));

            prop_assert_eq!(grouping.record_count(), records.len());
            for (label, bucket) in grouping.iter() {
                prop_assert!(!bucket.is_empty());
                for record in bucket {
                    let expected = if record.get("v").is_null() {
                        UNGROUPED_LABEL.to_string()
                    } else {
                        record.get("v").to_display_string()
                    };
                    prop_assert_eq!(label, expected.as_str());
                }
            }
        }

        /// Bucket order follows first appearance, bucket contents follow input order
        #[test]
        fn buckets_follow_first_appearance(records in records_strategy()) {
            let grouping = group(&records, Some("v"));

            let first_ids: Vec<i64> = grouping
                .iter()
                .map(|(_, bucket)| bucket[0].get("id").as_integer().unwrap_or(-1))
                .collect();
            prop_assert!(first_ids.windows(2).all(|pair| pair[0] < pair[1]));
            for (_, bucket) in grouping.iter() {
                let bucket_ids = ids(bucket);
                prop_assert!(bucket_ids.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }
    }
}
