//! Artifact cache
//!
//! Maps `(document, citation)` to a rendered proof. Misses run the citation
//! service and store the result; a citation without a match is never cached.
//! Concurrent misses on one key may both render; the store keeps the last
//! write. A hit whose source document has been removed is dropped and
//! reported as not found. The cache never deletes on its own: `evict`, `list_keys` and
//! `sweep` are driven from outside.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::store::ArtifactStore;
use super::types::{Artifact, ArtifactKey, ArtifactMeta};
use crate::citation::CitationService;
use crate::document::{DocumentError, Result};

/// Limits applied by `ArtifactCache::sweep`
///
/// Expired entries go first, then the oldest entries until both the count
/// and byte bounds hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionPolicy {
    pub max_age: Option<Duration>,
    pub max_entries: Option<usize>,
    pub max_bytes: Option<u64>,
}

impl EvictionPolicy {
    pub fn is_unbounded(&self) -> bool {
        self.max_age.is_none() && self.max_entries.is_none() && self.max_bytes.is_none()
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub examined: usize,
    pub expired: usize,
    pub trimmed: usize,
    pub remaining: usize,
    pub remaining_bytes: u64,
}

impl SweepReport {
    pub fn evicted(&self) -> usize {
        self.expired + self.trimmed
    }
}

/// Cache of highlighted proofs keyed by `(document, citation)`
#[derive(Clone)]
pub struct ArtifactCache {
    inner: Arc<ArtifactCacheInner>,
}

struct ArtifactCacheInner {
    store: Arc<dyn ArtifactStore>,
    service: CitationService,
}

impl ArtifactCache {
    pub fn new(store: Arc<dyn ArtifactStore>, service: CitationService) -> Self {
        Self {
            inner: Arc::new(ArtifactCacheInner { store, service }),
        }
    }

    pub fn service(&self) -> &CitationService {
        &self.inner.service
    }

    /// Cached artifact for `(document, citation)`, rendering it on a miss
    ///
    /// `Ok(None)` means the citation matched nothing; nothing is stored.
    pub async fn get_or_create(&self, document: &str, citation: &str) -> Result<Option<Artifact>> {
        let key = ArtifactKey::new(document, citation);
        if let Some(artifact) = self.inner.store.get(&key).await? {
            if !self.inner.service.documents().exists(document).await {
                tracing::info!(document = %document, "Source document gone, dropping cached artifact");
                self.inner.store.remove(&key).await?;
                return Err(DocumentError::DocumentNotFound(document.to_string()));
            }
            tracing::debug!(document = %document, "Artifact cache hit");
            return Ok(Some(artifact));
        }

        tracing::debug!(document = %document, "Artifact cache miss");
        let Some(proof) = self.inner.service.prove(document, citation).await? else {
            return Ok(None);
        };

        let page_number = proof.result.page_number.ok_or_else(|| {
            DocumentError::InvalidRect("matched block has no page".into())
        })?;
        let artifact = Artifact::new(
            ArtifactMeta {
                key,
                page_number,
                score: proof.result.score,
                size: proof.data.len(),
                created_at: Utc::now(),
            },
            proof.data,
        );

        self.inner.store.put(artifact.clone()).await?;
        Ok(Some(artifact))
    }

    /// Cached artifact without rendering
    pub async fn get(&self, document: &str, citation: &str) -> Result<Option<Artifact>> {
        self.inner
            .store
            .get(&ArtifactKey::new(document, citation))
            .await
    }

    /// Drop one entry; returns whether it existed
    pub async fn evict(&self, key: &ArtifactKey) -> Result<bool> {
        let removed = self.inner.store.remove(key).await?;
        if removed {
            tracing::info!(document = %key.document, "Evicted artifact");
        }
        Ok(removed)
    }

    /// Every cached key, oldest first
    pub async fn list_keys(&self) -> Result<Vec<ArtifactKey>> {
        Ok(self.entries().await?.into_iter().map(|m| m.key).collect())
    }

    /// Metadata of every cached artifact, oldest first
    pub async fn entries(&self) -> Result<Vec<ArtifactMeta>> {
        let mut entries = self.inner.store.entries().await?;
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.key.document.cmp(&b.key.document))
                .then_with(|| a.key.citation.cmp(&b.key.citation))
        });
        Ok(entries)
    }

    /// Apply `policy` once against the current time
    pub async fn sweep(&self, policy: &EvictionPolicy) -> Result<SweepReport> {
        self.sweep_at(policy, Utc::now()).await
    }

    /// Apply `policy` once as if the current time were `now`
    pub async fn sweep_at(&self, policy: &EvictionPolicy, now: DateTime<Utc>) -> Result<SweepReport> {
        let entries = self.entries().await?;
        let mut report = SweepReport {
            examined: entries.len(),
            ..Default::default()
        };

        let max_age = policy
            .max_age
            .and_then(|age| chrono::Duration::from_std(age).ok());

        let mut kept = Vec::with_capacity(entries.len());
        for meta in entries {
            let expired = max_age.is_some_and(|age| now - meta.created_at > age);
            if expired {
                if self.inner.store.remove(&meta.key).await? {
                    report.expired += 1;
                }
            } else {
                kept.push(meta);
            }
        }

        let mut total_bytes: u64 = kept.iter().map(|m| m.size as u64).sum();
        let mut kept = kept.into_iter();
        let mut remaining = Vec::new();
        let mut count = kept.len();

        while let Some(meta) = kept.next() {
            let over_entries = policy.max_entries.is_some_and(|max| count > max);
            let over_bytes = policy.max_bytes.is_some_and(|max| total_bytes > max);
            if !(over_entries || over_bytes) {
                remaining.push(meta);
                remaining.extend(kept.by_ref());
                break;
            }
            if self.inner.store.remove(&meta.key).await? {
                report.trimmed += 1;
            }
            count -= 1;
            total_bytes -= meta.size as u64;
        }

        report.remaining = remaining.len();
        report.remaining_bytes = remaining.iter().map(|m| m.size as u64).sum();

        if report.evicted() > 0 {
            tracing::info!(
                expired = report.expired,
                trimmed = report.trimmed,
                remaining = report.remaining,
                "Artifact sweep"
            );
        }
        Ok(report)
    }
}
