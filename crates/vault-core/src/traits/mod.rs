//! Core traits defined in `vault-core` and implemented by other crates.

pub mod store;

pub use store::{BlobStore, ByteStream, StoredBlob};
