//! Pagination utilities

use crate::core::error::ConfigWarning;
use serde::{Deserialize, Serialize};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page sizes offered to the user by default
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Current page and page size of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(default_page(), default_page_size())
    }
}

impl PaginationState {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Same state with another page size; the page resets to 1
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self::new(1, page_size)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number after clamping (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total_items: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,

    /// 1-based position of the first item shown, `None` when the page is empty
    pub first_item: Option<usize>,

    /// 1-based position of the last item shown
    pub last_item: Option<usize>,
}

impl PaginationMeta {
    /// Compute metadata, clamping the page into range
    ///
    /// Clamping is reported through the returned warnings rather than as an error.
    pub fn new(page: usize, page_size: usize, total_items: usize) -> (Self, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();

        let used_size = if page_size == 0 {
            tracing::warn!(requested = page_size, used = 1, "page size out of range");
            warnings.push(ConfigWarning::PageSizeClamped {
                requested: page_size,
                used: 1,
            });
            1
        } else {
            page_size
        };

        let total_pages = total_pages(total_items, used_size);
        let clamped = clamp_page(page, total_pages);
        if clamped != page {
            tracing::warn!(requested = page, clamped, total_pages, "page out of range");
            warnings.push(ConfigWarning::PageClamped {
                requested: page,
                clamped,
            });
        }

        let start = (clamped - 1) * used_size;
        let end = (start + used_size).min(total_items);
        let (first_item, last_item) = if start < end {
            (Some(start + 1), Some(end))
        } else {
            (None, None)
        };

        let meta = Self {
            page: clamped,
            page_size: used_size,
            total_items,
            total_pages,
            has_next: clamped < total_pages,
            has_prev: clamped > 1,
            first_item,
            last_item,
        };
        (meta, warnings)
    }

    /// Index range of the page within the full sequence
    pub fn range(&self) -> std::ops::Range<usize> {
        match (self.first_item, self.last_item) {
            (Some(first), Some(last)) => (first - 1)..last,
            _ => 0..0,
        }
    }

    /// Displayed range such as `26-50`, or `0-0` for an empty list
    pub fn range_label(&self) -> String {
        match (self.first_item, self.last_item) {
            (Some(first), Some(last)) => format!("{}-{}", first, last),
            _ => "0-0".to_string(),
        }
    }
}

/// `max(1, ceil(total_items / page_size))`
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a page number into `1..=total_pages`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One page of items with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ConfigWarning>,
}

/// Slice one page out of `items`
///
/// An out-of-range page is clamped, a zero page size is treated as 1; both are
/// reported in [`Page::warnings`].
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let (pagination, warnings) = PaginationMeta::new(page, page_size, items.len());
    Page {
        items: items[pagination.range()].to_vec(),
        pagination,
        warnings,
    }
}

/// Entry of a pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "page")]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Page numbers to show in a pager
///
/// Every page is listed when `total_pages <= max_displayed`. Otherwise the first
/// and last pages stay visible with `sibling_count` pages on each side of the
/// current one, and elided runs become [`PageLink::Ellipsis`]. The side without
/// an ellipsis shows `3 + 2 * sibling_count` pages.
pub fn page_links(
    current: usize,
    total_pages: usize,
    sibling_count: usize,
    max_displayed: usize,
) -> Vec<PageLink> {
    let total = total_pages.max(1);
    let all = || (1..=total).map(PageLink::Page).collect::<Vec<_>>();
    if total <= max_displayed {
        return all();
    }

    let current = clamp_page(current, total);
    let left_sibling = current.saturating_sub(sibling_count).max(1);
    let right_sibling = current.saturating_add(sibling_count).min(total);
    let show_left_dots = left_sibling > 2;
    let show_right_dots = right_sibling + 1 < total;
    let edge_count = sibling_count.saturating_mul(2).saturating_add(3);

    match (show_left_dots, show_right_dots) {
        (false, true) if edge_count.saturating_add(1) < total => {
            let mut links: Vec<PageLink> = (1..=edge_count).map(PageLink::Page).collect();
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(total));
            links
        }
        (true, false) if edge_count.saturating_add(1) < total => {
            let mut links = vec![PageLink::Page(1), PageLink::Ellipsis];
            links.extend((total - edge_count + 1..=total).map(PageLink::Page));
            links
        }
        (true, true) => {
            let mut links = vec![PageLink::Page(1), PageLink::Ellipsis];
            links.extend((left_sibling..=right_sibling).map(PageLink::Page));
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(total));
            links
        }
        _ => all(),
    }
}
