//! Upload service: content-addressed ingestion with dedup registration.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use vault_core::config::storage::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::store::{BlobStore, ByteStream, StoredBlob};
use vault_database::repositories::dedup::DedupIndexRepository;
use vault_entity::dedup::RegisterOutcome;
use vault_entity::record::{FileRecord, NewFileRecord};

/// Handles uploads: hash, store, and register in the dedup index.
#[derive(Clone)]
pub struct UploadService {
    /// Dedup index repository (owns the registration transaction).
    dedup: Arc<DedupIndexRepository>,
    /// Blob store.
    store: Arc<dyn BlobStore>,
    /// Storage configuration.
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

/// Upload parameters (single request with full content in memory).
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Filename as supplied by the caller.
    pub filename: String,
    /// Declared media type; defaults to `application/octet-stream`.
    pub media_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        dedup: Arc<DedupIndexRepository>,
        store: Arc<dyn BlobStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            dedup,
            store,
            config,
        }
    }

    /// Performs an in-memory upload.
    pub async fn upload(&self, request: UploadRequest) -> AppResult<(FileRecord, RegisterOutcome)> {
        let filename = validated_filename(&request.filename)?;

        if request.data.is_empty() {
            return Err(AppError::validation("Upload content must not be empty"));
        }
        if request.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let stored = self.store.put_bytes(request.data).await?;
        self.register(filename, request.media_type, stored).await
    }

    /// Performs a streaming upload; the content is spooled and hashed
    /// without buffering the whole file in memory.
    pub async fn upload_stream(
        &self,
        filename: &str,
        media_type: Option<String>,
        stream: ByteStream,
    ) -> AppResult<(FileRecord, RegisterOutcome)> {
        let filename = validated_filename(filename)?;

        let stored = self.store.put_stream(stream).await?;

        // Content-derived rejections are safe to clean up after: every
        // concurrent upload of the same bytes fails the same check, so the
        // blob can never be registered.
        if stored.size_bytes == 0 {
            self.discard(&stored).await;
            return Err(AppError::validation("Upload content must not be empty"));
        }
        if stored.size_bytes > self.config.max_upload_size_bytes {
            self.discard(&stored).await;
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        self.register(filename, media_type, stored).await
    }

    async fn register(
        &self,
        filename: String,
        media_type: Option<String>,
        stored: StoredBlob,
    ) -> AppResult<(FileRecord, RegisterOutcome)> {
        let draft = NewFileRecord {
            original_filename: filename,
            declared_media_type: media_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size_bytes: stored.size_bytes as i64,
            content_hash: stored.content_hash.clone(),
            storage_key: stored.locator.clone(),
        };

        let (record, outcome) = match self.dedup.register(&draft).await {
            Ok(registered) => registered,
            Err(e) => {
                // The blob stays: its content key may already be shared with
                // a concurrent identical upload. Reconciliation reclaims it.
                warn!(
                    locator = %stored.locator,
                    "Registration failed; blob retained for reconciliation"
                );
                return Err(e);
            }
        };

        info!(
            record_id = %record.id,
            filename = %record.original_filename,
            size = record.size_bytes,
            duplicate = record.is_duplicate,
            references = outcome.reference_count,
            "Upload registered"
        );

        Ok((record, outcome))
    }

    /// Best-effort removal of a blob this call just wrote and then rejected.
    async fn discard(&self, stored: &StoredBlob) {
        if !stored.newly_written {
            return;
        }
        if let Err(e) = self.store.delete(&stored.locator).await {
            warn!(locator = %stored.locator, error = %e, "Failed to discard rejected blob");
        }
    }
}

fn validated_filename(filename: &str) -> AppResult<String> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Filename must not be blank"));
    }
    Ok(trimmed.to_string())
}
