//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::store::{BlobStore, ByteStream, StoredBlob};

use crate::hasher::ContentHasher;

/// Directory under the root holding published blobs.
const OBJECTS_DIR: &str = "objects";
/// Directory under the root holding in-flight staging files.
const STAGING_DIR: &str = "tmp";

/// Content-addressed blob store on the local filesystem.
///
/// Blobs live at `objects/<first two hex chars>/<hash>`. Incoming content
/// is spooled into `tmp/` while being hashed, then published with a hard
/// link so the first writer of a hash wins and later writers observe the
/// existing blob.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for blobs and staging files.
    root: PathBuf,
    /// Hashes known to be on disk, to skip repeat stat calls.
    known: DashSet<String>,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        for dir in [root.clone(), root.join(OBJECTS_DIR), root.join(STAGING_DIR)] {
            fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create storage directory: {}", dir.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            root,
            known: DashSet::new(),
        })
    }

    /// Resolve a locator to an absolute path within the root.
    fn resolve(&self, locator: &str) -> PathBuf {
        self.root.join(locator.trim_start_matches('/'))
    }

    /// A fresh staging path for one in-flight write.
    fn staging_path(&self) -> PathBuf {
        self.root.join(STAGING_DIR).join(Uuid::new_v4().to_string())
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Spool a stream into the staging file while hashing it.
    async fn spool_stream(
        &self,
        staging: &Path,
        mut stream: ByteStream,
    ) -> AppResult<(String, u64)> {
        let mut file = fs::File::create(staging).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create staging file", e)
        })?;

        let mut hasher = ContentHasher::new();
        let mut size_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            hasher.update(&chunk);
            size_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush staging file", e))?;

        Ok((hasher.finalize(), size_bytes))
    }

    /// Publish a fully spooled staging file under its content hash.
    ///
    /// The hard link claims the object path atomically; losing the race
    /// to an identical concurrent write is a success with
    /// `newly_written = false`. The staging file is removed either way.
    async fn publish(
        &self,
        staging: &Path,
        content_hash: String,
        size_bytes: u64,
    ) -> AppResult<StoredBlob> {
        let locator = object_locator(&content_hash);
        let target = self.resolve(&locator);
        self.ensure_parent(&target).await?;

        let linked = fs::hard_link(staging, &target).await;
        let _ = fs::remove_file(staging).await;
        let newly_written = match linked {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => false,
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to publish blob {content_hash}"),
                    e,
                ));
            }
        };

        self.known.insert(content_hash.clone());
        debug!(content_hash = %content_hash, size_bytes, newly_written, "Stored blob");
        Ok(StoredBlob {
            content_hash,
            size_bytes,
            locator,
            newly_written,
        })
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put_bytes(&self, data: Bytes) -> AppResult<StoredBlob> {
        let content_hash = ContentHasher::hash_bytes(&data);
        let size_bytes = data.len() as u64;
        if self.exists(&content_hash).await? {
            return Ok(StoredBlob {
                locator: object_locator(&content_hash),
                content_hash,
                size_bytes,
                newly_written: false,
            });
        }

        let staging = self.staging_path();
        if let Err(e) = fs::write(&staging, &data).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                "Failed to write staging file",
                e,
            ));
        }
        self.publish(&staging, content_hash, size_bytes).await
    }

    async fn put_stream(&self, stream: ByteStream) -> AppResult<StoredBlob> {
        let staging = self.staging_path();
        match self.spool_stream(&staging, stream).await {
            Ok((content_hash, size_bytes)) => {
                self.publish(&staging, content_hash, size_bytes).await
            }
            Err(e) => {
                let _ = fs::remove_file(&staging).await;
                Err(e)
            }
        }
    }

    async fn get(&self, locator: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(locator);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {locator}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {locator}"),
                    e,
                )
            }
        })?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn get_bytes(&self, locator: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(locator);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {locator}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {locator}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let full_path = self.resolve(locator);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete blob: {locator}"),
                    e,
                )
            })?;
        }
        if let Some(hash) = Path::new(locator).file_name().and_then(|n| n.to_str()) {
            self.known.remove(hash);
        }
        Ok(())
    }

    async fn exists(&self, content_hash: &str) -> AppResult<bool> {
        if self.known.contains(content_hash) {
            return Ok(true);
        }
        let on_disk = self.resolve(&object_locator(content_hash)).exists();
        if on_disk {
            self.known.insert(content_hash.to_string());
        }
        Ok(on_disk)
    }
}

/// The locator for a content hash: `objects/<first two hex chars>/<hash>`.
fn object_locator(content_hash: &str) -> String {
    let shard = content_hash.get(..2).unwrap_or(content_hash);
    format!("{OBJECTS_DIR}/{shard}/{content_hash}")
}
