//! Pagination types for the remote collection convention.

use serde::{Deserialize, Serialize};

/// One slice of a remote collection plus the metadata needed to derive the
/// total page count.
///
/// The wire payload carries `items`, `itemsCount`, `totalCount`,
/// `pageIndex`, and `pageSize`. The total page count is intentionally
/// **not** a field: remotes that transmit a `totalPagesCount` are ignored
/// on decode, and [`Page::total_pages_count`] recomputes it from
/// `total_count` and `page_size` so the two can never desynchronize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Number of items actually returned on this page.
    pub items_count: u64,
    /// Total number of items across the whole collection.
    pub total_count: u64,
    /// The requested page index.
    pub page_index: u64,
    /// The requested page size.
    pub page_size: u64,
}

impl<T> Page<T> {
    /// Create a page from its items and collection metadata.
    pub fn new(items: Vec<T>, page_index: u64, page_size: u64, total_count: u64) -> Self {
        let items_count = items.len() as u64;
        Self {
            items,
            items_count,
            total_count,
            page_index,
            page_size,
        }
    }

    /// The synthetic page returned when paging past the end of the
    /// collection: no items, zero counts, echoing the requested index and
    /// size.
    pub fn empty(page_index: u64, page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            items_count: 0,
            total_count: 0,
            page_index,
            page_size,
        }
    }

    /// Total page count, recomputed on every call as
    /// `ceil(total_count / page_size)`.
    pub fn total_pages_count(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }
}
