//! # vault-core
//!
//! Core crate for HashVault. Contains the blob store trait, configuration
//! schemas, pagination/sorting/query types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other HashVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
