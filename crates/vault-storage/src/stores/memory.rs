//! In-memory blob store.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::{DashMap, Entry};
use futures::stream::{self, StreamExt};

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::store::{BlobStore, ByteStream, StoredBlob};

use crate::hasher::ContentHasher;

/// Content-addressed blob store held entirely in memory.
///
/// The locator is the content hash itself. Used by tests and as the
/// reference implementation of the store contract.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put_bytes(&self, data: Bytes) -> AppResult<StoredBlob> {
        let content_hash = ContentHasher::hash_bytes(&data);
        let size_bytes = data.len() as u64;
        let newly_written = match self.objects.entry(content_hash.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(data);
                true
            }
        };
        Ok(StoredBlob {
            locator: content_hash.clone(),
            content_hash,
            size_bytes,
            newly_written,
        })
    }

    async fn put_stream(&self, mut stream: ByteStream) -> AppResult<StoredBlob> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            buffer.extend_from_slice(&chunk);
        }
        self.put_bytes(buffer.freeze()).await
    }

    async fn get(&self, locator: &str) -> AppResult<ByteStream> {
        let data = self.get_bytes(locator).await?;
        Ok(Box::pin(stream::iter(vec![Ok(data)])))
    }

    async fn get_bytes(&self, locator: &str) -> AppResult<Bytes> {
        self.objects
            .get(locator)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {locator}")))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        self.objects.remove(locator);
        Ok(())
    }

    async fn exists(&self, content_hash: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(content_hash))
    }
}
