//! Artifact storage backends

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::types::{Artifact, ArtifactKey, ArtifactMeta};
use crate::document::Result;

/// Default entry bound of the in-memory store
pub const DEFAULT_MEMORY_CAPACITY: usize = 256;

/// Write-once-per-key byte store with listing and delete-by-key
///
/// Concurrent `put`s on the same key are last-write-wins.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Load an artifact
    async fn get(&self, key: &ArtifactKey) -> Result<Option<Artifact>>;

    /// Store an artifact, replacing any previous one under the same key
    async fn put(&self, artifact: Artifact) -> Result<()>;

    /// Delete an artifact; returns whether it existed
    async fn remove(&self, key: &ArtifactKey) -> Result<bool>;

    /// Metadata of every stored artifact
    async fn entries(&self) -> Result<Vec<ArtifactMeta>>;
}

/// In-process store bounded by entry count (least recently used goes first)
pub struct MemoryArtifactStore {
    cache: Mutex<LruCache<ArtifactKey, Artifact>>,
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryArtifactStore {
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn get(&self, key: &ArtifactKey) -> Result<Option<Artifact>> {
        Ok(self.cache.lock().get(key).cloned())
    }

    async fn put(&self, artifact: Artifact) -> Result<()> {
        let key = artifact.meta.key.clone();
        if let Some((evicted, _)) = self.cache.lock().push(key.clone(), artifact) {
            if evicted != key {
                tracing::debug!(document = %evicted.document, "Memory artifact store full, dropped LRU entry");
            }
        }
        Ok(())
    }

    async fn remove(&self, key: &ArtifactKey) -> Result<bool> {
        Ok(self.cache.lock().pop(key).is_some())
    }

    async fn entries(&self) -> Result<Vec<ArtifactMeta>> {
        Ok(self
            .cache
            .lock()
            .iter()
            .map(|(_, artifact)| artifact.meta.clone())
            .collect())
    }
}
