//! Pagination types for search and listing operations.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
///
/// Values are kept as received; [`PageRequest::validate`] rejects zero
/// values and [`PageRequest::limit`] caps oversized pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Reject non-positive page parameters.
    pub fn validate(&self) -> AppResult<()> {
        if self.page == 0 {
            return Err(AppError::validation("page must be a positive integer"));
        }
        if self.page_size == 0 {
            return Err(AppError::validation("page_size must be a positive integer"));
        }
        Ok(())
    }

    /// Return the SQL `LIMIT` value, capped at [`MAX_PAGE_SIZE`].
    pub fn limit(&self) -> u64 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata attached to every result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of items matching the query across all pages.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Effective number of items per page.
    pub page_size: u64,
    /// Total number of pages (0 when nothing matched).
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T: Serialize> {
    /// The items on this page.
    pub results: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

impl<T: Serialize> Page<T> {
    /// Create a new paginated response.
    pub fn new(results: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            results,
            pagination: Pagination {
                total,
                page,
                page_size,
                total_pages,
                has_next: page < total_pages,
                has_previous: page > 1,
            },
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
