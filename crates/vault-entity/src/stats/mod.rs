//! Stats report domain entities.

pub mod model;

pub use model::{format_bytes, FileStats, MonthCount, SizeDistribution, StorageSavings, TypeCount};
