//! Dedup index repository implementation.
//!
//! Registration and release each run as a single transaction across
//! `dedup_index` and `file_records`, so the index can only drift from the
//! catalog through outside interference, never through a half-applied
//! operation.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_entity::dedup::{
    DedupEntry, HashSavings, IndexDiscrepancy, RebuildSummary, RegisterOutcome, ReleaseOutcome,
    SavingsTotals,
};
use vault_entity::record::{FileRecord, NewFileRecord};

/// Repository for the dedup index and its coupled catalog mutations.
#[derive(Debug, Clone)]
pub struct DedupIndexRepository {
    pool: SqlitePool,
}

impl DedupIndexRepository {
    /// Create a new dedup index repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register an upload: claim or reference the content hash and insert
    /// the catalog record, atomically.
    ///
    /// The upsert is the arbitration point for concurrent identical
    /// uploads: exactly one caller inserts the entry and becomes
    /// canonical; every other caller lands on the conflict branch and is
    /// registered as a duplicate of the winner.
    pub async fn register(
        &self,
        data: &NewFileRecord,
    ) -> AppResult<(FileRecord, RegisterOutcome)> {
        let candidate_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let (canonical_id, reference_count, entry_size): (Uuid, i64, i64) = sqlx::query_as(
            "INSERT INTO dedup_index (content_hash, canonical_id, reference_count, size_bytes) \
             VALUES (?, ?, 1, ?) \
             ON CONFLICT(content_hash) DO UPDATE SET reference_count = reference_count + 1 \
             RETURNING canonical_id, reference_count, size_bytes",
        )
        .bind(&data.content_hash)
        .bind(candidate_id)
        .bind(data.size_bytes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert dedup entry", e)
        })?;

        let is_new = reference_count == 1;
        if !is_new && entry_size != data.size_bytes {
            return Err(AppError::consistency(format!(
                "Content hash {} is indexed with size {entry_size} but the upload measured {}",
                data.content_hash, data.size_bytes
            )));
        }

        let record = FileRecord {
            id: candidate_id,
            original_filename: data.original_filename.clone(),
            declared_media_type: data.declared_media_type.clone(),
            size_bytes: data.size_bytes,
            uploaded_at: Utc::now(),
            content_hash: data.content_hash.clone(),
            is_duplicate: !is_new,
            canonical_reference_id: (!is_new).then_some(canonical_id),
            storage_key: data.storage_key.clone(),
        };

        sqlx::query(
            "INSERT INTO file_records \
             (id, original_filename, declared_media_type, size_bytes, uploaded_at, \
              content_hash, is_duplicate, canonical_reference_id, storage_key) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(&record.original_filename)
        .bind(&record.declared_media_type)
        .bind(record.size_bytes)
        .bind(record.uploaded_at)
        .bind(&record.content_hash)
        .bind(record.is_duplicate)
        .bind(record.canonical_reference_id)
        .bind(&record.storage_key)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert file record", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        Ok((
            record,
            RegisterOutcome {
                is_new,
                canonical_id,
                reference_count,
            },
        ))
    }

    /// Release one record's reference to its content, atomically.
    ///
    /// Deletes the record, decrements the entry, and either drops the
    /// entry (last reference: the caller may purge the blob) or promotes
    /// the oldest survivor when the canonical record departed.
    pub async fn release(&self, record_id: Uuid) -> AppResult<ReleaseOutcome> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let record = sqlx::query_as::<_, FileRecord>(
            "DELETE FROM file_records WHERE id = ? RETURNING *",
        )
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete file record", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("File record {record_id} not found")))?;

        let entry = sqlx::query_as::<_, (Uuid, i64)>(
            "UPDATE dedup_index SET reference_count = reference_count - 1 \
             WHERE content_hash = ? RETURNING canonical_id, reference_count",
        )
        .bind(&record.content_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decrement dedup entry", e)
        })?;

        let Some((canonical_id, remaining)) = entry else {
            return Err(AppError::consistency(format!(
                "No dedup entry for content hash {}",
                record.content_hash
            )));
        };
        if remaining < 0 {
            return Err(AppError::consistency(format!(
                "Reference count for content hash {} fell below zero",
                record.content_hash
            )));
        }

        let blob_released = remaining == 0;
        if blob_released {
            sqlx::query("DELETE FROM dedup_index WHERE content_hash = ?")
                .bind(&record.content_hash)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to drop dedup entry", e)
                })?;
        } else if canonical_id == record.id {
            promote_successor(&mut tx, &record).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit release", e)
        })?;

        Ok(ReleaseOutcome {
            record,
            blob_released,
            remaining_references: remaining,
        })
    }

    /// Load the index entry for a content hash.
    pub async fn entry(&self, content_hash: &str) -> AppResult<Option<DedupEntry>> {
        sqlx::query_as::<_, DedupEntry>("SELECT * FROM dedup_index WHERE content_hash = ?")
            .bind(content_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load dedup entry", e)
            })
    }

    /// Savings attributable to one content hash.
    pub async fn savings_for(&self, content_hash: &str) -> AppResult<Option<HashSavings>> {
        Ok(self.entry(content_hash).await?.map(|entry| HashSavings {
            reference_count: entry.reference_count,
            bytes_saved: entry.bytes_saved(),
        }))
    }

    /// Catalog-wide savings aggregates, one pass over distinct hashes.
    pub async fn savings_totals(&self) -> AppResult<SavingsTotals> {
        sqlx::query_as::<_, SavingsTotals>(
            "SELECT COUNT(*) AS distinct_hashes, \
                    COALESCE(SUM(reference_count), 0) AS total_references, \
                    COALESCE(SUM(size_bytes), 0) AS unique_bytes, \
                    COALESCE(SUM(size_bytes * (reference_count - 1)), 0) AS bytes_saved \
             FROM dedup_index",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate savings", e)
        })
    }

    /// Compare the index against the catalog and report every hash whose
    /// reference count disagrees, including entries with no records and
    /// records with no entry.
    pub async fn verify(&self) -> AppResult<Vec<IndexDiscrepancy>> {
        sqlx::query_as::<_, IndexDiscrepancy>(
            "SELECT c.content_hash AS content_hash, \
                    c.refs AS catalog_references, \
                    COALESCE(i.reference_count, 0) AS index_references \
             FROM (SELECT content_hash, COUNT(*) AS refs \
                   FROM file_records GROUP BY content_hash) c \
             LEFT JOIN dedup_index i ON i.content_hash = c.content_hash \
             WHERE COALESCE(i.reference_count, 0) <> c.refs \
             UNION ALL \
             SELECT i.content_hash, 0, i.reference_count \
             FROM dedup_index i \
             WHERE NOT EXISTS \
                   (SELECT 1 FROM file_records r WHERE r.content_hash = i.content_hash) \
             ORDER BY content_hash",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to verify dedup index", e)
        })
    }

    /// Rebuild the index from the catalog, the recovery path for a
    /// corrupted or lost index.
    ///
    /// Canonical ownership goes to the oldest record per hash, matching
    /// the promotion rule, and every record's duplicate flags are
    /// rewritten to agree with the rebuilt index.
    pub async fn rebuild(&self) -> AppResult<RebuildSummary> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let entries_removed = sqlx::query("DELETE FROM dedup_index")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear dedup index", e)
            })?
            .rows_affected();

        let entries_created = sqlx::query(
            "INSERT INTO dedup_index (content_hash, canonical_id, reference_count, size_bytes) \
             SELECT r.content_hash, \
                    (SELECT r2.id FROM file_records r2 \
                     WHERE r2.content_hash = r.content_hash \
                     ORDER BY r2.uploaded_at ASC, r2.id ASC LIMIT 1), \
                    COUNT(*), \
                    MAX(r.size_bytes) \
             FROM file_records r GROUP BY r.content_hash",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rebuild dedup index", e)
        })?
        .rows_affected();

        let records_updated = sqlx::query(
            "UPDATE file_records SET \
                is_duplicate = id <> (SELECT canonical_id FROM dedup_index d \
                                      WHERE d.content_hash = file_records.content_hash), \
                canonical_reference_id = CASE \
                    WHEN id = (SELECT canonical_id FROM dedup_index d \
                               WHERE d.content_hash = file_records.content_hash) THEN NULL \
                    ELSE (SELECT canonical_id FROM dedup_index d \
                          WHERE d.content_hash = file_records.content_hash) END",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reapply duplicate flags", e)
        })?
        .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit rebuild", e)
        })?;

        Ok(RebuildSummary {
            entries_removed,
            entries_created,
            records_updated,
        })
    }
}

/// Hand canonical ownership to the oldest surviving record for the
/// departed canonical's hash.
async fn promote_successor(
    tx: &mut Transaction<'_, Sqlite>,
    departed: &FileRecord,
) -> AppResult<()> {
    let heir = sqlx::query_as::<_, FileRecord>(
        "SELECT * FROM file_records WHERE content_hash = ? \
         ORDER BY uploaded_at ASC, id ASC LIMIT 1",
    )
    .bind(&departed.content_hash)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to find successor record", e)
    })?
    .ok_or_else(|| {
        AppError::consistency(format!(
            "Positive reference count but no records remain for content hash {}",
            departed.content_hash
        ))
    })?;

    sqlx::query(
        "UPDATE file_records SET is_duplicate = 0, canonical_reference_id = NULL WHERE id = ?",
    )
    .bind(heir.id)
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to promote successor", e))?;

    sqlx::query(
        "UPDATE file_records SET canonical_reference_id = ? \
         WHERE content_hash = ? AND id <> ?",
    )
    .bind(heir.id)
    .bind(&departed.content_hash)
    .bind(heir.id)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to repoint duplicate records", e)
    })?;

    sqlx::query("UPDATE dedup_index SET canonical_id = ? WHERE content_hash = ?")
        .bind(heir.id)
        .bind(&departed.content_hash)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update canonical owner", e)
        })?;

    Ok(())
}
