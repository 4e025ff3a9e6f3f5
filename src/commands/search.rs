//! Catalog search CLI command.

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::commands::Services;
use crate::output::{self, OutputFormat};
use vault_core::error::AppError;
use vault_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use vault_core::types::query::{DateRange, SearchQuery, SizeRange};
use vault_core::types::sorting::{SortKey, SortOrder};
use vault_entity::stats::format_bytes;

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Filename substring to match (case-insensitive)
    pub query: Option<String>,

    /// Filter by declared media type ("all" disables the filter)
    #[arg(short = 't', long)]
    pub file_type: Option<String>,

    /// Minimum size in bytes, inclusive
    #[arg(long)]
    pub min_size: Option<u64>,

    /// Maximum size in bytes, inclusive
    #[arg(long)]
    pub max_size: Option<u64>,

    /// Earliest upload date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Latest upload date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Sort column (uploaded_at, name, size, type)
    #[arg(short, long, default_value = "uploaded_at")]
    pub sort_by: String,

    /// Sort direction (asc, desc)
    #[arg(short, long, default_value = "desc")]
    pub order: String,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: u64,

    /// Results per page (capped at 100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
}

/// Search result display row
#[derive(Debug, Serialize, Tabled)]
struct RecordRow {
    /// Record ID
    id: String,
    /// Filename
    name: String,
    /// Media type
    media_type: String,
    /// Size
    size: String,
    /// Upload time
    uploaded: String,
    /// Duplicate marker
    dup: String,
}

/// Execute the search command
pub async fn execute(
    args: &SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let query = SearchQuery {
        text_query: args.query.clone(),
        file_type: args.file_type.clone(),
        size_range: SizeRange {
            min: args.min_size,
            max: args.max_size,
        },
        date_range: DateRange {
            start: args.start_date,
            end: args.end_date,
        },
        sort_by: SortKey::parse_or_default(&args.sort_by),
        sort_order: SortOrder::parse_or_default(&args.order),
        page: PageRequest::new(args.page, args.page_size),
    };

    let results = services.query.search(&query).await?;

    if format == OutputFormat::Json {
        output::print_json(&results);
        return Ok(());
    }

    let rows: Vec<RecordRow> = results
        .results
        .iter()
        .map(|r| RecordRow {
            id: r.id.to_string(),
            name: r.original_filename.clone(),
            media_type: r.declared_media_type.clone(),
            size: format_bytes(r.size_bytes),
            uploaded: r.uploaded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            dup: if r.is_duplicate { "dup" } else { "" }.to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    output::print_pagination(&results.pagination);

    Ok(())
}
