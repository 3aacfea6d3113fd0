//! Citation service
//!
//! Fetches a document, extracts its blocks, locates a citation and renders
//! the highlighted copy. MuPDF and lopdf work is synchronous, so each step
//! runs on the blocking pool under the configured request timeout.

use std::sync::Arc;

use tokio::time::{timeout, Duration};

use super::matcher::locate;
use crate::document::{Block, DocumentError, DocumentStore, MatchResult, Result};
use crate::highlight::render_match;
use crate::mupdf::{extract_blocks, StextOptions};

/// Default timeout for extraction and rendering
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A located citation together with its highlighted artifact bytes
#[derive(Debug, Clone)]
pub struct Proof {
    pub result: MatchResult,
    pub data: Vec<u8>,
}

/// Citation pipeline over a backing document store
#[derive(Clone)]
pub struct CitationService {
    documents: Arc<dyn DocumentStore>,
    options: StextOptions,
    timeout_secs: u64,
}

impl CitationService {
    pub fn new(documents: Arc<dyn DocumentStore>, timeout_secs: u64) -> Self {
        Self {
            documents,
            options: StextOptions::default(),
            timeout_secs,
        }
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.documents
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Extract every block of a stored document
    pub async fn blocks(&self, key: &str) -> Result<Vec<Block>> {
        let data = self.documents.fetch(key).await?;
        self.extract(data).await
    }

    /// Locate `citation` in a stored document without rendering
    pub async fn search(&self, key: &str, citation: &str) -> Result<MatchResult> {
        let blocks = self.blocks(key).await?;
        let result = locate(&blocks, citation);

        tracing::debug!(
            document = %key,
            found = result.found,
            page = ?result.page_number,
            score = result.score,
            "Citation search"
        );
        Ok(result)
    }

    /// Locate `citation` and render the highlighted copy
    ///
    /// Returns `Ok(None)` when no block shares a word with the citation; no
    /// render is attempted in that case.
    pub async fn prove(&self, key: &str, citation: &str) -> Result<Option<Proof>> {
        let data = self.documents.fetch(key).await?;
        let blocks = self.extract(Arc::clone(&data)).await?;

        let result = locate(&blocks, citation);
        if !result.found {
            tracing::debug!(document = %key, "Citation not found, skipping render");
            return Ok(None);
        }

        let rendered = self.render(data, result.clone()).await?;
        tracing::info!(
            document = %key,
            page = ?result.page_number,
            score = result.score,
            bytes = rendered.len(),
            "Rendered citation proof"
        );
        Ok(Some(Proof {
            result,
            data: rendered,
        }))
    }

    async fn extract(&self, data: Arc<Vec<u8>>) -> Result<Vec<Block>> {
        let options = self.options.clone();
        run_blocking(self.timeout_secs, Stage::Extract, move || {
            extract_blocks(&data, &options)
        })
        .await
    }

    async fn render(&self, data: Arc<Vec<u8>>, result: MatchResult) -> Result<Vec<u8>> {
        run_blocking(self.timeout_secs, Stage::Render, move || {
            render_match(&data, &result)
        })
        .await
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Extract,
    Render,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Extract => "extraction",
            Stage::Render => "render",
        }
    }

    fn task_failed(self, err: tokio::task::JoinError) -> DocumentError {
        match self {
            Stage::Extract => {
                DocumentError::DocumentUnreadable(format!("Extraction task failed: {}", err))
            }
            Stage::Render => DocumentError::RenderFailed(format!("Render task failed: {}", err)),
        }
    }
}

/// Run `task` on the blocking pool; running past the timeout is a failed render
async fn run_blocking<T, F>(timeout_secs: u64, stage: Stage, task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match timeout(Duration::from_secs(timeout_secs), tokio::task::spawn_blocking(task)).await {
        Ok(joined) => joined.map_err(|e| stage.task_failed(e))?,
        Err(_) => {
            tracing::warn!(timeout = timeout_secs, stage = stage.name(), "Blocking step timed out");
            Err(DocumentError::RenderFailed(format!(
                "{} timed out after {} seconds",
                stage.name(),
                timeout_secs
            )))
        }
    }
}
