//! Shared fixtures for integration tests

#![allow(dead_code, unused_imports)]

use std::path::Path;
use std::sync::Arc;

use citation_proof_server::artifacts::{ArtifactStore, MemoryArtifactStore};
use citation_proof_server::document::FsDocumentStore;
use citation_proof_server::AppState;

#[path = "../../src/test_pdf.rs"]
mod test_pdf;

pub use test_pdf::{floats, guide_pdf, highlights_on, text_pdf, Line, LYMPHOMA_SENTENCE};

/// Temporary documents directory holding `guide.pdf`
pub fn documents_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("guide.pdf"), guide_pdf()).unwrap();
    dir
}

/// Application state over `dir` with an in-memory artifact store
pub fn app_state(dir: &Path) -> (AppState, Arc<MemoryArtifactStore>) {
    let store = Arc::new(MemoryArtifactStore::new(64));
    let artifact_store: Arc<dyn ArtifactStore> = store.clone();
    let state = AppState::with_defaults(Arc::new(FsDocumentStore::new(dir)), artifact_store, 30)
        .unwrap();
    (state, store)
}
