//! Offset-based pagination utilities.
//!
//! Listing endpoints take `skip`/`limit` and answer with one page plus the
//! total number of rows matching the query (not just the page).

use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Hard upper bound for a single page.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Requested window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Creates a page request, clamping `limit` to `max_limit`.
    pub fn new(offset: u32, limit: u32, max_limit: u32) -> Self {
        Self {
            offset,
            limit: limit.min(max_limit),
        }
    }

    /// Builds a page request from optional query values.
    pub fn from_query(
        skip: Option<u32>,
        limit: Option<u32>,
        default_limit: u32,
        max_limit: u32,
    ) -> Self {
        Self::new(skip.unwrap_or(0), limit.unwrap_or(default_limit), max_limit)
    }

    /// Offset as the signed integer SQL expects.
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }

    /// Limit as the signed integer SQL expects.
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results and the total count of the underlying query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let page = PageRequest::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_request_clamps_limit() {
        let page = PageRequest::new(10, 5000, MAX_PAGE_LIMIT);
        assert_eq!(page.offset, 10);
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_page_request_from_query_defaults() {
        let page = PageRequest::from_query(None, None, 100, 1000);
        assert_eq!(page, PageRequest::new(0, 100, 1000));

        let page = PageRequest::from_query(Some(20), Some(5), 100, 1000);
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 5);
    }

    #[test]
    fn test_page_request_sql_values() {
        let page = PageRequest::new(u32::MAX, 50, 100);
        assert_eq!(page.sql_offset(), i64::from(u32::MAX));
        assert_eq!(page.sql_limit(), 50);
    }

    #[test]
    fn test_page_total_independent_of_items() {
        let page = Page::new(vec![1, 2, 3], 42);
        assert_eq!(page.len(), 3);
        assert_eq!(page.total, 42);

        let page: Page<u8> = Page::new(Vec::new(), 7);
        assert!(page.is_empty());
        assert_eq!(page.total, 7);
    }
}
