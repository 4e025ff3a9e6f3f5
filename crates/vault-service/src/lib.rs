//! # vault-service
//!
//! Business logic service layer for HashVault. Each service orchestrates
//! repositories and the blob store to implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod files;
pub mod query;
pub mod reconcile;
pub mod stats;
pub mod upload;

pub use files::FileService;
pub use query::QueryService;
pub use reconcile::ReconcileService;
pub use stats::StatsService;
pub use upload::{UploadRequest, UploadService};
