//! Compact query-string form of a list configuration

use crate::query::filter::FilterSet;
use crate::query::pagination::PaginationState;
use crate::query::sort::SortSpec;
use serde::Deserialize;
use serde_json::Value;

/// Largest page size accepted from a query string
pub const MAX_LIMIT: usize = 100;

/// Query parameters for pagination, filtering and sorting
///
/// All parameters have sensible defaults.
///
/// # Example
/// ```text
/// ?page=2&limit=10
/// ?filter={"status": "active"}
/// ?page=1&limit=20&filter={"amount>": 100}&sort=created_at:desc
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value}`
    pub filter: Option<String>,

    /// Sort keys, comma separated
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    pub sort: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::query::pagination::DEFAULT_PAGE_SIZE,
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Parse filter JSON string into Value
    ///
    /// Malformed JSON is dropped with a warning.
    pub fn filter_value(&self) -> Option<Value> {
        let raw = self.filter.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(filter = raw, error = %e, "ignoring malformed filter parameter");
                None
            }
        }
    }

    pub fn filters(&self) -> FilterSet {
        self.filter_value()
            .map(|value| FilterSet::from_query_value(&value))
            .unwrap_or_default()
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort.as_deref().map(SortSpec::parse).unwrap_or_default()
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState::new(self.page(), self.limit())
    }

    /// Split into the pieces of live list state
    pub fn into_parts(self) -> (FilterSet, SortSpec, PaginationState) {
        (self.filters(), self.sort_spec(), self.pagination())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::FilterPredicate;
    use crate::query::sort::SortKey;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 25);
        assert!(params.filters().is_empty());
        assert!(params.sort_spec().is_empty());
    }

    #[test]
    fn test_limit_and_page_are_clamped() {
        let params = QueryParams {
            page: 0,
            limit: 1000,
            ..Default::default()
        };
        assert_eq!(params.pagination(), PaginationState::new(1, 100));

        let params = QueryParams {
            limit: 0,
            ..Default::default()
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let params: QueryParams = serde_json::from_value(serde_json::json!({
            "page": 3,
            "filter": "{\"status\": \"active\", \"amount>\": 100}",
            "sort": "amount:desc,name"
        }))
        .unwrap();

        let (filters, sort, pagination) = params.into_parts();
        assert_eq!(pagination, PaginationState::new(3, 25));
        assert_eq!(
            sort,
            SortSpec::new(vec![SortKey::desc("amount"), SortKey::asc("name")])
        );
        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters.get("amount>"),
            Some(&FilterPredicate::greater_than("amount", 100))
        );
    }

    #[test]
    fn test_malformed_filter_is_ignored() {
        let params = QueryParams {
            filter: Some("{not json".to_string()),
            ..Default::default()
        };
        assert_eq!(params.filter_value(), None);
        assert!(params.filters().is_empty());
    }
}
