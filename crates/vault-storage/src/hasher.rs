//! Streaming SHA-256 content fingerprinting.

use sha2::{Digest, Sha256};

/// Incremental SHA-256 hasher producing lowercase hex fingerprints.
///
/// Content is hashed while it is spooled to storage, so a blob is never
/// read twice just to learn its identity.
#[derive(Default)]
pub struct ContentHasher {
    digest: Sha256,
}

impl ContentHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self {
            digest: Sha256::new(),
        }
    }

    /// Feed a chunk of content into the hasher.
    pub fn update(&mut self, chunk: &[u8]) {
        self.digest.update(chunk);
    }

    /// Consume the hasher and return the fingerprint as lowercase hex.
    pub fn finalize(self) -> String {
        format!("{:x}", self.digest.finalize())
    }

    /// Fingerprint a complete in-memory buffer.
    pub fn hash_bytes(data: &[u8]) -> String {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
