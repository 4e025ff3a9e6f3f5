//! Embedded schema migrations for the catalog database.

use sqlx::SqlitePool;
use tracing::info;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;

/// Apply any catalog migrations not yet recorded in the database.
///
/// The migration files are compiled into the binary, so a freshly created
/// database is brought to the current schema on first connect.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
        })?;

    info!("Catalog schema is up to date");
    Ok(())
}
