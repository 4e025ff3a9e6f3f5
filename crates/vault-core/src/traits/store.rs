//! Blob store trait for pluggable content-addressed backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// The result of storing content.
///
/// The store derives the key from the content itself, so callers learn
/// the hash and locator from this struct rather than choosing them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredBlob {
    /// Lowercase hex SHA-256 of the stored bytes.
    pub content_hash: String,
    /// Size of the stored content in bytes.
    pub size_bytes: u64,
    /// Provider-specific locator for retrieving the blob.
    pub locator: String,
    /// Whether this call physically wrote the blob. False when identical
    /// content was already present.
    pub newly_written: bool,
}

/// Trait for content-addressed blob store backends.
///
/// Storing the same bytes twice is idempotent: the second call finds the
/// existing blob and reports `newly_written = false`. The trait is
/// defined here in `vault-core` and implemented in `vault-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the store is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store a complete in-memory buffer.
    async fn put_bytes(&self, data: Bytes) -> AppResult<StoredBlob>;

    /// Store a byte stream, hashing it while it is written.
    ///
    /// If the stream fails partway through, nothing is published and the
    /// staging data is discarded.
    async fn put_stream(&self, stream: ByteStream) -> AppResult<StoredBlob>;

    /// Read a blob and return its byte stream.
    async fn get(&self, locator: &str) -> AppResult<ByteStream>;

    /// Read a blob into memory as a complete byte buffer.
    async fn get_bytes(&self, locator: &str) -> AppResult<Bytes>;

    /// Delete a blob. Deleting an absent blob is not an error.
    async fn delete(&self, locator: &str) -> AppResult<()>;

    /// Check whether content with the given hash is stored.
    async fn exists(&self, content_hash: &str) -> AppResult<bool>;
}
