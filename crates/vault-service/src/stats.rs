//! Deduplication savings and catalog statistics.

use std::sync::Arc;

use vault_core::result::AppResult;
use vault_database::repositories::catalog::CatalogRepository;
use vault_database::repositories::dedup::DedupIndexRepository;
use vault_entity::stats::{format_bytes, FileStats, StorageSavings};

/// Aggregates catalog and dedup index figures into report payloads.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// Catalog repository.
    catalog: Arc<CatalogRepository>,
    /// Dedup index repository.
    dedup: Arc<DedupIndexRepository>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(catalog: Arc<CatalogRepository>, dedup: Arc<DedupIndexRepository>) -> Self {
        Self { catalog, dedup }
    }

    /// Space saved by deduplication across the whole catalog.
    pub async fn storage_savings(&self) -> AppResult<StorageSavings> {
        let totals = self.dedup.savings_totals().await?;

        Ok(StorageSavings {
            total_bytes_saved: totals.bytes_saved,
            total_duplicate_count: totals.total_references - totals.distinct_hashes,
            total_files: totals.total_references,
            efficiency_percentage: efficiency_percentage(totals.bytes_saved, totals.unique_bytes),
            formatted_bytes_saved: format_bytes(totals.bytes_saved),
        })
    }

    /// The combined dashboard payload: counts, savings, and distributions.
    pub async fn file_stats(&self) -> AppResult<FileStats> {
        let totals = self.dedup.savings_totals().await?;

        Ok(FileStats {
            total_files: self.catalog.count_all().await?,
            total_size: self.catalog.total_size_bytes().await?,
            duplicate_count: self.catalog.duplicate_count().await?,
            bytes_saved: totals.bytes_saved,
            efficiency_percentage: efficiency_percentage(totals.bytes_saved, totals.unique_bytes),
            file_types: self.catalog.file_type_histogram().await?,
            size_distribution: self.catalog.size_distribution().await?,
            date_distribution: self.catalog.date_distribution().await?,
        })
    }
}

/// Share of logical bytes that deduplication avoided storing, as a
/// percentage rounded to two decimals. Zero when nothing is stored.
fn efficiency_percentage(bytes_saved: i64, unique_bytes: i64) -> f64 {
    let logical_total = bytes_saved + unique_bytes;
    if logical_total <= 0 {
        return 0.0;
    }
    let percentage = bytes_saved as f64 / logical_total as f64 * 100.0;
    (percentage * 100.0).round() / 100.0
}
