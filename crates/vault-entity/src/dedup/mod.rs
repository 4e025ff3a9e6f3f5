//! Dedup index domain entities.

pub mod model;

pub use model::{
    DedupEntry, HashSavings, IndexDiscrepancy, RebuildSummary, RegisterOutcome, ReleaseOutcome,
    SavingsTotals,
};
