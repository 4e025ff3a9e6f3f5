//! Stats and savings report payloads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The storage savings report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSavings {
    /// Bytes avoided by sharing blobs between duplicate uploads.
    pub total_bytes_saved: i64,
    /// Number of records registered as duplicates.
    pub total_duplicate_count: i64,
    /// Total number of records in the catalog.
    pub total_files: i64,
    /// Saved bytes as a share of all logical bytes ingested, in percent,
    /// rounded to two decimals.
    pub efficiency_percentage: f64,
    /// Human-readable rendering of `total_bytes_saved`.
    pub formatted_bytes_saved: String,
}

/// One row of the media-type histogram.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TypeCount {
    /// Main media type (the part before the `/`).
    #[serde(rename = "type")]
    pub media_type: String,
    /// Number of records with this main type.
    pub count: i64,
}

/// Record counts bucketed by size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct SizeDistribution {
    /// Records under 1 MiB.
    pub small: i64,
    /// Records between 1 MiB and 10 MiB inclusive.
    pub medium: i64,
    /// Records over 10 MiB.
    pub large: i64,
}

/// One row of the monthly upload distribution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthCount {
    /// Month in `YYYY-MM` form.
    pub month: String,
    /// Number of records uploaded in that month.
    pub count: i64,
}

/// The combined catalog statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStats {
    /// Total number of records in the catalog.
    pub total_files: i64,
    /// Sum of the declared sizes of all records (logical bytes).
    pub total_size: i64,
    /// Number of records registered as duplicates.
    pub duplicate_count: i64,
    /// Bytes avoided through deduplication.
    pub bytes_saved: i64,
    /// Deduplication efficiency in percent.
    pub efficiency_percentage: f64,
    /// Records per main media type, most common first.
    pub file_types: Vec<TypeCount>,
    /// Records per size bucket.
    pub size_distribution: SizeDistribution,
    /// Records per upload month, oldest first.
    pub date_distribution: Vec<MonthCount>,
}

/// Render a byte count as a human-readable string with two decimals.
pub fn format_bytes(bytes: i64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}
