//! Dedup index entities and operation outcomes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::record::FileRecord;

/// One row of the dedup index: a distinct content hash and its bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DedupEntry {
    /// SHA-256 fingerprint of the content, lowercase hex.
    pub content_hash: String,
    /// The file record that owns the stored blob.
    pub canonical_id: Uuid,
    /// Number of file records referencing this content.
    pub reference_count: i64,
    /// Size of the content in bytes.
    pub size_bytes: i64,
}

impl DedupEntry {
    /// Bytes saved by deduplicating this content: every reference beyond
    /// the first shares the canonical blob.
    pub fn bytes_saved(&self) -> i64 {
        self.size_bytes * (self.reference_count - 1).max(0)
    }
}

/// Result of registering an upload against the dedup index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOutcome {
    /// Whether this content was seen for the first time.
    pub is_new: bool,
    /// The canonical record for the content.
    pub canonical_id: Uuid,
    /// Reference count after the registration.
    pub reference_count: i64,
}

/// Result of releasing a file record's reference to its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseOutcome {
    /// The record that was removed from the catalog.
    pub record: FileRecord,
    /// Whether the last reference was released and the blob can be purged.
    pub blob_released: bool,
    /// References remaining after the release.
    pub remaining_references: i64,
}

/// Per-hash savings lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashSavings {
    /// Number of file records referencing the content.
    pub reference_count: i64,
    /// Bytes saved for this content.
    pub bytes_saved: i64,
}

/// Catalog-wide savings aggregates, computed over distinct hashes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavingsTotals {
    /// Number of distinct content hashes stored.
    pub distinct_hashes: i64,
    /// Total references across all hashes (equals the catalog row count).
    pub total_references: i64,
    /// Bytes physically stored, one copy per distinct hash.
    pub unique_bytes: i64,
    /// Bytes avoided by sharing blobs between references.
    pub bytes_saved: i64,
}

/// A disagreement between the catalog and the dedup index for one hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndexDiscrepancy {
    /// The content hash in question.
    pub content_hash: String,
    /// How many catalog records reference the hash.
    pub catalog_references: i64,
    /// What the index claims the reference count is (0 for a missing entry).
    pub index_references: i64,
}

/// Result of rebuilding the dedup index from the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Index entries discarded before the rebuild.
    pub entries_removed: u64,
    /// Index entries recreated from the catalog.
    pub entries_created: u64,
    /// Catalog records swept while reapplying duplicate flags.
    pub records_updated: u64,
}
