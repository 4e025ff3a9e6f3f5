//! Repository implementations for the file catalog and dedup index.

pub mod catalog;
pub mod dedup;

pub use catalog::CatalogRepository;
pub use dedup::DedupIndexRepository;
