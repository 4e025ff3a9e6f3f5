//! Single file record display command.

use clap::Args;
use uuid::Uuid;

use crate::commands::Services;
use crate::output::{self, OutputFormat};
use vault_core::error::AppError;
use vault_entity::record::FileRecord;
use vault_entity::stats::format_bytes;

/// Arguments for the info command
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// File record ID
    pub id: Uuid,
}

/// Execute the info command
pub async fn execute(
    args: &InfoArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let record = services.files.get(args.id).await?;

    match format {
        OutputFormat::Json => output::print_json(&record),
        OutputFormat::Table => print_record(&record),
    }

    Ok(())
}

/// Render a record as key-value lines
pub fn print_record(record: &FileRecord) {
    output::print_kv("ID", &record.id.to_string());
    output::print_kv("Filename", &record.original_filename);
    output::print_kv("Media type", &record.declared_media_type);
    output::print_kv(
        "Size",
        &format!("{} ({} bytes)", format_bytes(record.size_bytes), record.size_bytes),
    );
    output::print_kv(
        "Uploaded",
        &record.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    output::print_kv("Content hash", &record.content_hash);
    output::print_kv("Storage key", &record.storage_key);
    output::print_kv("Duplicate", if record.is_duplicate { "yes" } else { "no" });
    if let Some(canonical) = record.canonical_reference_id {
        output::print_kv("Canonical record", &canonical.to_string());
    }
}
