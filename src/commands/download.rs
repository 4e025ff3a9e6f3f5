//! File download CLI command.

use std::path::PathBuf;

use clap::Args;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::commands::Services;
use crate::output;
use vault_core::error::{AppError, ErrorKind};

/// Arguments for the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File record ID
    pub id: Uuid,

    /// Output path (defaults to the stored filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the download command
pub async fn execute(args: &DownloadArgs, services: &Services) -> Result<(), AppError> {
    let (record, mut stream) = services.files.download(args.id).await?;

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&record.original_filename));

    let mut file = tokio::fs::File::create(&target).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to create output file", e)
    })?;

    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read blob stream", e)
        })?;
        file.write_all(&chunk).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to write output file", e)
        })?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to flush output file", e)
    })?;

    output::print_success(&format!(
        "Downloaded '{}' to '{}' ({} bytes)",
        record.original_filename,
        target.display(),
        written
    ));

    Ok(())
}
