//! File upload CLI command.

use std::path::PathBuf;

use clap::Args;
use futures::StreamExt;
use tokio_util::io::ReaderStream;

use crate::commands::Services;
use crate::output::{self, OutputFormat};
use vault_core::error::{AppError, ErrorKind};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub file: PathBuf,

    /// Override the stored filename
    #[arg(short, long)]
    pub name: Option<String>,

    /// Override the declared media type (guessed from the name otherwise)
    #[arg(short, long)]
    pub media_type: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    if !args.file.exists() {
        return Err(AppError::not_found(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    let filename = args.name.clone().unwrap_or_else(|| {
        args.file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string()
    });

    let media_type = args.media_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string()
    });

    let handle = tokio::fs::File::open(&args.file).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to open file for upload", e)
    })?;
    let stream = ReaderStream::new(handle).boxed();

    let (record, outcome) = services
        .upload
        .upload_stream(&filename, Some(media_type), stream)
        .await?;

    if format == OutputFormat::Json {
        output::print_json(&record);
        return Ok(());
    }

    if outcome.is_new {
        output::print_success(&format!(
            "Uploaded '{}' (id: {}, {} bytes, new content)",
            record.original_filename, record.id, record.size_bytes
        ));
    } else {
        output::print_success(&format!(
            "Uploaded '{}' (id: {}, duplicate of {}, {} reference(s))",
            record.original_filename,
            record.id,
            outcome.canonical_id,
            outcome.reference_count
        ));
    }

    Ok(())
}
