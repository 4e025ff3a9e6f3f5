//! # vault-database
//!
//! SQLite connection management, embedded migrations, and the concrete
//! repositories over the file catalog and dedup index.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
