//! Application state management

use std::sync::Arc;

use crate::anchors::{AnchorOptions, AnchorProcessor};
use crate::artifacts::{ArtifactCache, ArtifactStore, EvictionPolicy};
use crate::citation::CitationService;
use crate::document::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    citations: CitationService,
    artifacts: ArtifactCache,
    anchors: AnchorProcessor,
    eviction: EvictionPolicy,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        artifact_store: Arc<dyn ArtifactStore>,
        anchors: AnchorProcessor,
        eviction: EvictionPolicy,
        timeout_secs: u64,
    ) -> Self {
        let citations = CitationService::new(documents, timeout_secs);
        let artifacts = ArtifactCache::new(artifact_store, citations.clone());
        Self {
            inner: Arc::new(AppStateInner {
                citations,
                artifacts,
                anchors,
                eviction,
            }),
        }
    }

    /// State with default anchors and no eviction limits
    pub fn with_defaults(
        documents: Arc<dyn DocumentStore>,
        artifact_store: Arc<dyn ArtifactStore>,
        timeout_secs: u64,
    ) -> Result<Self, crate::anchors::AnchorError> {
        Ok(Self::new(
            documents,
            artifact_store,
            AnchorProcessor::new(AnchorOptions::default())?,
            EvictionPolicy::default(),
            timeout_secs,
        ))
    }

    pub fn citations(&self) -> &CitationService {
        &self.inner.citations
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        self.inner.citations.documents()
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.inner.artifacts
    }

    pub fn anchors(&self) -> &AnchorProcessor {
        &self.inner.anchors
    }

    /// Policy applied by the sweeper and `POST /api/v1/artifacts/sweep`
    pub fn eviction(&self) -> &EvictionPolicy {
        &self.inner.eviction
    }
}
