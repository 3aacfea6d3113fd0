//! Artifact cache types

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cache key: document key plus the raw citation text
///
/// Equality is exact and case-sensitive; citations are never normalized here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub document: String,
    pub citation: String,
}

impl ArtifactKey {
    pub fn new(document: impl Into<String>, citation: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            citation: citation.into(),
        }
    }

    /// SHA-256 hex digest used as the storage name
    ///
    /// The document key is length-prefixed so `("ab", "c")` and `("a", "bc")`
    /// never collide.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.document.len().to_le_bytes());
        hasher.update(self.document.as_bytes());
        hasher.update(self.citation.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// What is known about a stored artifact without loading its bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub key: ArtifactKey,
    /// 1-based page carrying the highlight
    pub page_number: usize,
    /// Match score that selected the block
    pub score: usize,
    /// Payload size in bytes
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

/// A rendered proof: the document with one highlight annotation
#[derive(Debug, Clone)]
pub struct Artifact {
    pub meta: ArtifactMeta,
    /// Shared payload; clones are reference-counted
    pub data: Bytes,
}

impl Artifact {
    pub fn new(meta: ArtifactMeta, data: impl Into<Bytes>) -> Self {
        Self {
            meta,
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let key = ArtifactKey::new("guide.pdf", "stage III lymphoma");
        let digest = key.digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, key.clone().digest());
    }

    #[test]
    fn test_clone_shares_payload() {
        let artifact = Artifact::new(
            ArtifactMeta {
                key: ArtifactKey::new("guide.pdf", "stage III"),
                page_number: 1,
                score: 2,
                size: 4,
                created_at: Utc::now(),
            },
            b"%PDF".to_vec(),
        );
        let copy = artifact.clone();
        assert_eq!(copy.data.as_ptr(), artifact.data.as_ptr());
        assert_eq!(&copy.data[..], b"%PDF");
    }

    #[test]
    fn test_digest_distinguishes_case_and_split() {
        let a = ArtifactKey::new("guide.pdf", "Stage III");
        let b = ArtifactKey::new("guide.pdf", "stage iii");
        assert_ne!(a.digest(), b.digest());

        let c = ArtifactKey::new("ab", "c");
        let d = ArtifactKey::new("a", "bc");
        assert_ne!(c.digest(), d.digest());
    }
}
