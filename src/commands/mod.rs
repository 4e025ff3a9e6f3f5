//! CLI command definitions and dispatch.

pub mod delete;
pub mod download;
pub mod info;
pub mod reconcile;
pub mod search;
pub mod stats;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use vault_core::config::AppConfig;
use vault_core::error::AppError;
use vault_core::traits::store::BlobStore;
use vault_database::DatabasePool;
use vault_database::migration::run_migrations;
use vault_database::repositories::{CatalogRepository, DedupIndexRepository};
use vault_service::{FileService, QueryService, ReconcileService, StatsService, UploadService};
use vault_storage::stores::local::LocalBlobStore;

/// HashVault: content-addressed file vault with metadata search
#[derive(Debug, Parser)]
#[command(name = "vault", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/default and config/<env>)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a file into the vault
    Upload(upload::UploadArgs),
    /// Search the catalog with filters, sorting, and pagination
    Search(search::SearchArgs),
    /// Show one file record
    Info(info::InfoArgs),
    /// Download a file's content
    Download(download::DownloadArgs),
    /// Delete a file record (content is kept while other records share it)
    Delete(delete::DeleteArgs),
    /// Upload counts per media type
    Types(stats::TypesArgs),
    /// Deduplication savings report
    Savings(stats::SavingsArgs),
    /// Full catalog statistics
    Stats(stats::StatsArgs),
    /// Verify or rebuild the dedup index
    Reconcile(reconcile::ReconcileArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let services = build_services(&config).await?;

        match &self.command {
            Commands::Upload(args) => upload::execute(args, &services, self.format).await,
            Commands::Search(args) => search::execute(args, &services, self.format).await,
            Commands::Info(args) => info::execute(args, &services, self.format).await,
            Commands::Download(args) => download::execute(args, &services).await,
            Commands::Delete(args) => delete::execute(args, &services).await,
            Commands::Types(args) => stats::execute_types(args, &services, self.format).await,
            Commands::Savings(args) => stats::execute_savings(args, &services, self.format).await,
            Commands::Stats(args) => stats::execute_stats(args, &services, self.format).await,
            Commands::Reconcile(args) => reconcile::execute(args, &services, self.format).await,
        }
    }
}

/// Service layer bundle shared by all commands.
pub struct Services {
    /// Upload service.
    pub upload: UploadService,
    /// Single-record operations.
    pub files: FileService,
    /// Search and distributions.
    pub query: QueryService,
    /// Savings and statistics.
    pub stats: StatsService,
    /// Index reconciliation.
    pub reconcile: ReconcileService,
}

/// Helper: connect the database, run migrations, and wire the services
pub async fn build_services(config: &AppConfig) -> Result<Services, AppError> {
    let pool = DatabasePool::connect(&config.database).await?.into_pool();
    run_migrations(&pool).await?;

    let store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(&config.storage.data_root).await?);
    let catalog = Arc::new(CatalogRepository::new(pool.clone()));
    let dedup = Arc::new(DedupIndexRepository::new(pool));

    Ok(Services {
        upload: UploadService::new(
            Arc::clone(&dedup),
            Arc::clone(&store),
            config.storage.clone(),
        ),
        files: FileService::new(Arc::clone(&catalog), Arc::clone(&dedup), store),
        query: QueryService::new(Arc::clone(&catalog)),
        stats: StatsService::new(catalog, Arc::clone(&dedup)),
        reconcile: ReconcileService::new(dedup),
    })
}
