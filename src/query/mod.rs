//! Record pipeline stages: filter, sort, group and paginate

pub mod filter;
pub mod group;
pub mod pagination;
pub mod params;
pub mod sort;

pub use filter::{FilterOperator, FilterPredicate, FilterSet, filter};
pub use group::{GroupExpansion, Grouping, UNGROUPED_LABEL, group};
pub use pagination::{
    DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, Page, PageLink, PaginationMeta, PaginationState,
    page_links, paginate,
};
pub use params::QueryParams;
pub use sort::{SortDirection, SortKey, SortSpec, sort};
