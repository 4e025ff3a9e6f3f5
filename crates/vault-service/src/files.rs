//! File record service: retrieval, download, and reference-counted delete.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::store::{BlobStore, ByteStream};
use vault_database::repositories::catalog::CatalogRepository;
use vault_database::repositories::dedup::DedupIndexRepository;
use vault_entity::dedup::ReleaseOutcome;
use vault_entity::record::FileRecord;

/// Handles single-record operations against catalog, index, and blob store.
#[derive(Clone)]
pub struct FileService {
    /// Catalog repository.
    catalog: Arc<CatalogRepository>,
    /// Dedup index repository.
    dedup: Arc<DedupIndexRepository>,
    /// Blob store.
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        catalog: Arc<CatalogRepository>,
        dedup: Arc<DedupIndexRepository>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            catalog,
            dedup,
            store,
        }
    }

    /// Fetches a single file record by id.
    pub async fn get(&self, record_id: Uuid) -> AppResult<FileRecord> {
        self.catalog
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File record {record_id} not found")))
    }

    /// Opens the record's content as a byte stream.
    pub async fn download(&self, record_id: Uuid) -> AppResult<(FileRecord, ByteStream)> {
        let record = self.get(record_id).await?;
        let stream = self.store.get(&record.storage_key).await?;
        Ok((record, stream))
    }

    /// Loads the record's full content into memory.
    pub async fn download_bytes(&self, record_id: Uuid) -> AppResult<(FileRecord, Bytes)> {
        let record = self.get(record_id).await?;
        let data = self.store.get_bytes(&record.storage_key).await?;
        Ok((record, data))
    }

    /// Deletes a record and releases its content reference; the blob is
    /// purged only when the last reference departs.
    pub async fn delete(&self, record_id: Uuid) -> AppResult<ReleaseOutcome> {
        let outcome = self.dedup.release(record_id).await?;

        if outcome.blob_released {
            self.purge_blob(&outcome.record).await;
        }

        info!(
            record_id = %outcome.record.id,
            filename = %outcome.record.original_filename,
            remaining = outcome.remaining_references,
            blob_released = outcome.blob_released,
            "File record deleted"
        );

        Ok(outcome)
    }

    /// Removes the blob behind a fully released record, unless the hash was
    /// re-registered between the release commit and now.
    async fn purge_blob(&self, record: &FileRecord) {
        match self.dedup.entry(&record.content_hash).await {
            Ok(None) => {
                if let Err(e) = self.store.delete(&record.storage_key).await {
                    warn!(
                        storage_key = %record.storage_key,
                        error = %e,
                        "Failed to purge released blob"
                    );
                } else {
                    debug!(storage_key = %record.storage_key, "Released blob purged");
                }
            }
            Ok(Some(_)) => {
                debug!(
                    content_hash = %record.content_hash,
                    "Content re-registered before purge; blob kept"
                );
            }
            Err(e) => {
                warn!(
                    content_hash = %record.content_hash,
                    error = %e,
                    "Purge re-check failed; blob left for reconciliation"
                );
            }
        }
    }
}
