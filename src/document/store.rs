//! Backing document store
//!
//! Read-only source of the original PDFs. The citation pipeline never writes
//! here; derived artifacts live in the artifact cache instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{DocumentError, Result};

/// Trait for document storage backends
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the raw bytes of a document
    async fn fetch(&self, key: &str) -> Result<Arc<Vec<u8>>>;

    /// List all document keys, sorted
    async fn list(&self) -> Result<Vec<String>>;

    /// Check whether a document exists
    async fn exists(&self, key: &str) -> bool;
}

/// Directory of PDF files, keyed by file name
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path inside the root
    ///
    /// Keys are bare file names. Anything that could address a file outside
    /// the root yields `None`.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
            || key.contains('\0')
        {
            return None;
        }
        if !is_pdf_name(key) {
            return None;
        }
        Some(self.root.join(key))
    }
}

fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn fetch(&self, key: &str) -> Result<Arc<Vec<u8>>> {
        let path = self
            .resolve(key)
            .ok_or_else(|| DocumentError::DocumentNotFound(key.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Arc::new(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::DocumentNotFound(key.to_string()))
            }
            Err(e) => Err(DocumentError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(DocumentError::Storage(e.to_string())),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DocumentError::Storage(e.to_string()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_pdf_name(name) {
                    keys.push(name.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> bool {
        match self.resolve(key) {
            Some(path) => tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }
}
