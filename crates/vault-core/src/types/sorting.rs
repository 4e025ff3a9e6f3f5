//! Sorting types for search results.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

impl SortOrder {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse a direction string, falling back to descending.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// The catalog columns a search can sort by.
///
/// An enum rather than a free-form string so sort keys can never smuggle
/// SQL into the `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Upload timestamp.
    UploadedAt,
    /// Original filename.
    OriginalFilename,
    /// File size in bytes.
    SizeBytes,
    /// Declared media type.
    DeclaredMediaType,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::UploadedAt
    }
}

impl SortKey {
    /// Return the catalog column for this key.
    pub fn column(&self) -> &'static str {
        match self {
            Self::UploadedAt => "uploaded_at",
            Self::OriginalFilename => "original_filename",
            Self::SizeBytes => "size_bytes",
            Self::DeclaredMediaType => "declared_media_type",
        }
    }

    /// Parse a sort key, falling back to the upload timestamp for
    /// unrecognized values.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "original_filename" | "filename" | "name" => Self::OriginalFilename,
            "size_bytes" | "size" => Self::SizeBytes,
            "declared_media_type" | "media_type" | "type" => Self::DeclaredMediaType,
            _ => Self::UploadedAt,
        }
    }
}
