//! File delete CLI command.

use clap::Args;
use uuid::Uuid;

use crate::commands::Services;
use crate::output;
use vault_core::error::AppError;

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// File record ID
    pub id: Uuid,
}

/// Execute the delete command
pub async fn execute(args: &DeleteArgs, services: &Services) -> Result<(), AppError> {
    let outcome = services.files.delete(args.id).await?;

    if outcome.blob_released {
        output::print_success(&format!(
            "Deleted '{}' and released its content",
            outcome.record.original_filename
        ));
    } else {
        output::print_success(&format!(
            "Deleted '{}' ({} record(s) still share its content)",
            outcome.record.original_filename, outcome.remaining_references
        ));
    }

    Ok(())
}
