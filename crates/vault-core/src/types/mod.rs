//! Core type definitions used across the HashVault workspace.

pub mod pagination;
pub mod query;
pub mod sorting;

pub use pagination::{Page, PageRequest, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use query::{DateRange, SearchQuery, SizeRange};
pub use sorting::{SortKey, SortOrder};
