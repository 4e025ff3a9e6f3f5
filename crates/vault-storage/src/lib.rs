//! # vault-storage
//!
//! Content-addressed blob store implementations for HashVault, plus the
//! streaming hasher that derives blob identities.

pub mod hasher;
pub mod stores;

pub use hasher::ContentHasher;
pub use stores::{LocalBlobStore, MemoryBlobStore};
