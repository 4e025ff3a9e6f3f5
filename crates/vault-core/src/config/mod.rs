//! Application configuration schemas.
//!
//! Configuration is merged from TOML files and environment variables by
//! the `config` crate; each sub-module holds one section of the schema.
//! Every section carries serde defaults, so an empty configuration is a
//! runnable one.

pub mod database;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration, the deserialization target for the
/// merged configuration sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and merge configuration for the named environment.
    ///
    /// Sources, in override order: `config/default.toml`, then
    /// `config/<env>.toml`, then `VAULT__`-prefixed environment variables
    /// (`VAULT__STORAGE__DATA_ROOT` overrides `storage.data_root`). All
    /// files are optional.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
