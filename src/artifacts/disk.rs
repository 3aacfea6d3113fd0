//! Filesystem artifact store
//!
//! Each artifact is `<digest>.pdf` plus a `<digest>.json` sidecar holding its
//! metadata. Both are written to a temporary name and renamed into place, so
//! readers never observe a partial file and racing writers resolve to
//! whichever rename lands last. The PDF is written before the sidecar; a
//! sidecar therefore always has its payload.
//!
//! Entries that cannot be served are removed instead of skipped: a corrupt or
//! mismatched sidecar is deleted with its payload on `get` and on listing.
//! Listing also deletes payloads without a sidecar and leftover temporary
//! files once they are older than the orphan grace period.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use super::store::ArtifactStore;
use super::types::{Artifact, ArtifactKey, ArtifactMeta};
use crate::document::{DocumentError, Result};

const PAYLOAD_EXT: &str = "pdf";
const META_EXT: &str = "json";
const TMP_EXT: &str = "tmp";

/// Age after which a payload without sidecar, or a temp file, is abandoned
pub const DEFAULT_ORPHAN_GRACE: Duration = Duration::from_secs(60);

/// Artifact store rooted at a directory
pub struct DiskArtifactStore {
    root: PathBuf,
    sequence: AtomicU64,
    orphan_grace: Duration,
}

/// Outcome of reading a sidecar
enum Sidecar {
    Missing,
    Corrupt(String),
    Valid(ArtifactMeta),
}

impl DiskArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: AtomicU64::new(0),
            orphan_grace: DEFAULT_ORPHAN_GRACE,
        }
    }

    /// Override how old an orphaned file must be before listing removes it
    pub fn with_orphan_grace(mut self, grace: Duration) -> Self {
        self.orphan_grace = grace;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn payload_path(&self, digest: &str) -> PathBuf {
        self.root.join(format!("{}.{}", digest, PAYLOAD_EXT))
    }

    fn meta_path(&self, digest: &str) -> PathBuf {
        self.root.join(format!("{}.{}", digest, META_EXT))
    }

    /// Write `data` to `target` through a uniquely named temporary file
    async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<()> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact");
        let tmp = self.root.join(format!(
            ".{}.{}-{}.{}",
            file_name,
            std::process::id(),
            seq,
            TMP_EXT
        ));

        tokio::fs::write(&tmp, data).await.map_err(storage_error)?;
        if let Err(e) = tokio::fs::rename(&tmp, target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage_error(e));
        }
        Ok(())
    }

    async fn read_meta(&self, path: &Path) -> Result<Sidecar> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Sidecar::Missing),
            Err(e) => return Err(storage_error(e)),
        };
        Ok(match serde_json::from_slice(&raw) {
            Ok(meta) => Sidecar::Valid(meta),
            Err(e) => Sidecar::Corrupt(e.to_string()),
        })
    }

    /// Delete both files of an entry
    async fn discard(&self, digest: &str) -> Result<bool> {
        // Sidecar first so the entry disappears from listings before its payload
        let had_meta = remove_if_present(&self.meta_path(digest)).await?;
        let had_payload = remove_if_present(&self.payload_path(digest)).await?;
        Ok(had_meta || had_payload)
    }

    async fn is_abandoned(&self, entry: &tokio::fs::DirEntry) -> bool {
        let modified = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default()
            >= self.orphan_grace
    }
}

fn storage_error(err: std::io::Error) -> DocumentError {
    DocumentError::Storage(err.to_string())
}

async fn remove_if_present(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(storage_error(e)),
    }
}

fn is_digest(stem: &str) -> bool {
    stem.len() == 64 && stem.chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait::async_trait]
impl ArtifactStore for DiskArtifactStore {
    async fn get(&self, key: &ArtifactKey) -> Result<Option<Artifact>> {
        let digest = key.digest();
        let mut meta = match self.read_meta(&self.meta_path(&digest)).await? {
            Sidecar::Missing => return Ok(None),
            Sidecar::Corrupt(reason) => {
                tracing::warn!(digest = %digest, error = %reason, "Corrupt artifact metadata, discarding entry");
                self.discard(&digest).await?;
                return Ok(None);
            }
            Sidecar::Valid(meta) if meta.key != *key => {
                tracing::warn!(digest = %digest, "Artifact metadata key mismatch, discarding entry");
                self.discard(&digest).await?;
                return Ok(None);
            }
            Sidecar::Valid(meta) => meta,
        };

        let data = match tokio::fs::read(self.payload_path(&digest)).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(digest = %digest, "Artifact payload missing, discarding entry");
                self.discard(&digest).await?;
                return Ok(None);
            }
            Err(e) => return Err(storage_error(e)),
        };
        meta.size = data.len();
        Ok(Some(Artifact::new(meta, data)))
    }

    async fn put(&self, artifact: Artifact) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(storage_error)?;

        let digest = artifact.meta.key.digest();
        let meta = serde_json::to_vec_pretty(&artifact.meta)
            .map_err(|e| DocumentError::Storage(e.to_string()))?;

        self.write_atomic(&self.payload_path(&digest), &artifact.data)
            .await?;
        self.write_atomic(&self.meta_path(&digest), &meta).await?;

        tracing::debug!(
            document = %artifact.meta.key.document,
            digest = %digest,
            bytes = artifact.data.len(),
            "Stored artifact on disk"
        );
        Ok(())
    }

    async fn remove(&self, key: &ArtifactKey) -> Result<bool> {
        self.discard(&key.digest()).await
    }

    async fn entries(&self) -> Result<Vec<ArtifactMeta>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(e)),
        };

        let mut metas = Vec::new();
        let mut sidecars = HashSet::new();
        let mut payloads = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(storage_error)? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let ext = path.extension().and_then(|e| e.to_str());

            if name.starts_with('.') && ext == Some(TMP_EXT) {
                if self.is_abandoned(&entry).await {
                    tracing::info!(path = %path.display(), "Removing abandoned temporary file");
                    remove_if_present(&path).await?;
                }
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_digest(stem) {
                continue;
            }

            match ext {
                Some(PAYLOAD_EXT) => payloads.push((stem.to_string(), entry)),
                Some(META_EXT) => {
                    sidecars.insert(stem.to_string());
                    match self.read_meta(&path).await? {
                        Sidecar::Valid(meta) => metas.push(meta),
                        Sidecar::Missing => {}
                        Sidecar::Corrupt(reason) => {
                            tracing::warn!(path = %path.display(), error = %reason, "Corrupt artifact metadata, discarding entry");
                            self.discard(stem).await?;
                        }
                    }
                }
                _ => {}
            }
        }

        for (digest, entry) in payloads {
            if sidecars.contains(&digest) || !self.is_abandoned(&entry).await {
                continue;
            }
            tracing::info!(digest = %digest, "Removing artifact payload without metadata");
            remove_if_present(&entry.path()).await?;
        }
        Ok(metas)
    }
}
