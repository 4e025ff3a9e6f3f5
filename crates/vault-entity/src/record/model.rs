//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file registered in the vault catalog.
///
/// Every upload produces one record, duplicates included. Records sharing
/// a `content_hash` share a single stored blob; exactly one of them is
/// the canonical owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The filename as provided at upload time.
    pub original_filename: String,
    /// MIME type declared by the uploader.
    pub declared_media_type: String,
    /// Content size in bytes.
    pub size_bytes: i64,
    /// When the record was registered.
    pub uploaded_at: DateTime<Utc>,
    /// SHA-256 fingerprint of the content, lowercase hex.
    pub content_hash: String,
    /// Whether this record arrived after its content was already stored.
    pub is_duplicate: bool,
    /// The canonical record owning the blob, when this is a duplicate.
    pub canonical_reference_id: Option<Uuid>,
    /// Locator of the shared blob within the store.
    pub storage_key: String,
}

impl FileRecord {
    /// The main media type, i.e. the part before the `/`.
    pub fn main_type(&self) -> &str {
        self.declared_media_type
            .split('/')
            .next()
            .unwrap_or(&self.declared_media_type)
    }
}

/// Data required to register a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileRecord {
    /// The filename as provided at upload time.
    pub original_filename: String,
    /// MIME type declared by the uploader.
    pub declared_media_type: String,
    /// Content size in bytes.
    pub size_bytes: i64,
    /// SHA-256 fingerprint of the content.
    pub content_hash: String,
    /// Locator of the blob within the store.
    pub storage_key: String,
}
