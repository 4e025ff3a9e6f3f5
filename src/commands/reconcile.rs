//! Dedup index reconciliation CLI command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::Services;
use crate::output::{self, OutputFormat};
use vault_core::error::AppError;

/// Arguments for the reconcile command
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Rebuild the index from the catalog instead of only reporting drift
    #[arg(long)]
    pub rebuild: bool,
}

/// Index drift display row
#[derive(Debug, Serialize, Tabled)]
struct DriftRow {
    /// Content hash
    content_hash: String,
    /// References counted in the catalog
    catalog: i64,
    /// References recorded in the index
    index: i64,
}

/// Execute the reconcile command
pub async fn execute(
    args: &ReconcileArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    if args.rebuild {
        let summary = services.reconcile.rebuild_index().await?;
        if format == OutputFormat::Json {
            output::print_json(&summary);
        } else {
            output::print_success(&format!(
                "Index rebuilt: {} entr(ies) replaced by {}, {} record(s) swept",
                summary.entries_removed, summary.entries_created, summary.records_updated
            ));
        }
        return Ok(());
    }

    let discrepancies = services.reconcile.verify_index().await?;

    if format == OutputFormat::Json {
        output::print_json(&discrepancies);
        return Ok(());
    }

    if discrepancies.is_empty() {
        output::print_success("Dedup index is consistent with the catalog");
        return Ok(());
    }

    output::print_warning(&format!(
        "{} content hash(es) disagree between index and catalog",
        discrepancies.len()
    ));
    let rows: Vec<DriftRow> = discrepancies
        .iter()
        .map(|d| DriftRow {
            content_hash: d.content_hash.clone(),
            catalog: d.catalog_references,
            index: d.index_references,
        })
        .collect();
    output::print_list(&rows, format);
    println!("Run 'vault reconcile --rebuild' to repair the index.");

    Ok(())
}
