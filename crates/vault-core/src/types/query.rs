//! Search query types for the file catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::pagination::PageRequest;
use crate::types::sorting::{SortKey, SortOrder};

/// Inclusive size bounds in bytes.
///
/// A range whose minimum exceeds its maximum is valid and simply matches
/// nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SizeRange {
    /// Smallest matching size, inclusive.
    pub min: Option<u64>,
    /// Largest matching size, inclusive.
    pub max: Option<u64>,
}

/// Inclusive upload-date bounds, compared at day granularity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest matching upload day, inclusive.
    pub start: Option<NaiveDate>,
    /// Latest matching upload day, inclusive.
    pub end: Option<NaiveDate>,
}

/// A catalog search.
///
/// Every filter is optional; present filters compose with AND. The
/// default query matches the whole catalog, newest uploads first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring match on the original filename.
    pub text_query: Option<String>,
    /// Exact match on the declared media type.
    pub file_type: Option<String>,
    /// Size bounds in bytes.
    #[serde(default)]
    pub size_range: SizeRange,
    /// Upload-date bounds.
    #[serde(default)]
    pub date_range: DateRange,
    /// Sort column.
    #[serde(default)]
    pub sort_by: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Page selection.
    #[serde(default)]
    pub page: PageRequest,
}

impl SearchQuery {
    /// Reject malformed query parameters.
    pub fn validate(&self) -> AppResult<()> {
        self.page.validate()
    }

    /// The text filter, with blank input treated as absent.
    pub fn text_filter(&self) -> Option<&str> {
        self.text_query
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The media-type filter. Blank input and the `"all"` sentinel both
    /// mean no filter.
    pub fn type_filter(&self) -> Option<&str> {
        self.file_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
    }
}
