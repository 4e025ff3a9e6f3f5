//! Dedup index reconciliation: drift detection and rebuild.

use std::sync::Arc;

use tracing::{info, warn};

use vault_core::result::AppResult;
use vault_database::repositories::dedup::DedupIndexRepository;
use vault_entity::dedup::{IndexDiscrepancy, RebuildSummary};

/// Checks and repairs the dedup index against the catalog.
#[derive(Debug, Clone)]
pub struct ReconcileService {
    /// Dedup index repository.
    dedup: Arc<DedupIndexRepository>,
}

impl ReconcileService {
    /// Creates a new reconcile service.
    pub fn new(dedup: Arc<DedupIndexRepository>) -> Self {
        Self { dedup }
    }

    /// Reports every content hash whose index entry disagrees with the
    /// catalog's reference count.
    pub async fn verify_index(&self) -> AppResult<Vec<IndexDiscrepancy>> {
        let discrepancies = self.dedup.verify().await?;

        if discrepancies.is_empty() {
            info!("Dedup index is consistent with the catalog");
        } else {
            warn!(
                count = discrepancies.len(),
                "Dedup index disagrees with the catalog"
            );
        }

        Ok(discrepancies)
    }

    /// Rebuilds the index from a full catalog scan.
    pub async fn rebuild_index(&self) -> AppResult<RebuildSummary> {
        let summary = self.dedup.rebuild().await?;

        info!(
            entries_removed = summary.entries_removed,
            entries_created = summary.entries_created,
            records_updated = summary.records_updated,
            "Dedup index rebuilt from catalog"
        );

        Ok(summary)
    }
}
