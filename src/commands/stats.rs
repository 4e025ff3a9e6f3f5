//! Statistics CLI commands: type histogram, savings report, full stats.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::Services;
use crate::output::{self, OutputFormat};
use vault_core::error::AppError;
use vault_entity::stats::{FileStats, StorageSavings, format_bytes};

/// Arguments for the types command
#[derive(Debug, Args)]
pub struct TypesArgs {}

/// Arguments for the savings command
#[derive(Debug, Args)]
pub struct SavingsArgs {}

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {}

/// Media type histogram row
#[derive(Debug, Serialize, Tabled)]
struct TypeRow {
    /// Main media type
    media_type: String,
    /// Upload count
    count: i64,
}

/// Month histogram row
#[derive(Debug, Serialize, Tabled)]
struct MonthRow {
    /// Calendar month
    month: String,
    /// Upload count
    count: i64,
}

/// Execute the types command
pub async fn execute_types(
    _args: &TypesArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let histogram = services.query.file_type_histogram().await?;

    if format == OutputFormat::Json {
        output::print_json(&histogram);
        return Ok(());
    }

    let rows: Vec<TypeRow> = histogram
        .iter()
        .map(|t| TypeRow {
            media_type: t.media_type.clone(),
            count: t.count,
        })
        .collect();
    output::print_list(&rows, format);

    Ok(())
}

/// Execute the savings command
pub async fn execute_savings(
    _args: &SavingsArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let savings = services.stats.storage_savings().await?;

    match format {
        OutputFormat::Json => output::print_json(&savings),
        OutputFormat::Table => print_savings(&savings),
    }

    Ok(())
}

/// Execute the stats command
pub async fn execute_stats(
    _args: &StatsArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stats = services.stats.file_stats().await?;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Table => print_stats(&stats),
    }

    Ok(())
}

fn print_savings(savings: &StorageSavings) {
    println!("Deduplication savings");
    output::print_kv("Files", &savings.total_files.to_string());
    output::print_kv("Duplicates", &savings.total_duplicate_count.to_string());
    output::print_kv(
        "Bytes saved",
        &format!(
            "{} ({} bytes)",
            savings.formatted_bytes_saved, savings.total_bytes_saved
        ),
    );
    output::print_kv(
        "Efficiency",
        &format!("{:.2}%", savings.efficiency_percentage),
    );
}

fn print_stats(stats: &FileStats) {
    println!("Catalog");
    output::print_kv("Files", &stats.total_files.to_string());
    output::print_kv("Duplicates", &stats.duplicate_count.to_string());
    output::print_kv("Logical size", &format_bytes(stats.total_size));
    output::print_kv("Bytes saved", &format_bytes(stats.bytes_saved));
    output::print_kv(
        "Efficiency",
        &format!("{:.2}%", stats.efficiency_percentage),
    );

    println!();
    println!("Size distribution");
    output::print_kv("Small (< 1 MiB)", &stats.size_distribution.small.to_string());
    output::print_kv(
        "Medium (1-10 MiB)",
        &stats.size_distribution.medium.to_string(),
    );
    output::print_kv("Large (> 10 MiB)", &stats.size_distribution.large.to_string());

    if !stats.file_types.is_empty() {
        println!();
        println!("Media types");
        for entry in &stats.file_types {
            output::print_kv(&entry.media_type, &entry.count.to_string());
        }
    }

    if !stats.date_distribution.is_empty() {
        println!();
        println!("Uploads per month");
        let rows: Vec<MonthRow> = stats
            .date_distribution
            .iter()
            .map(|m| MonthRow {
                month: m.month.clone(),
                count: m.count,
            })
            .collect();
        output::print_list(&rows, OutputFormat::Table);
    }
}
