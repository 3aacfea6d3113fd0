//! Artifact cache
//!
//! Rendered proofs keyed by `(document, citation)`, with pluggable storage:
//! an LRU-bounded in-memory store and a directory store that survives
//! restarts. Lifetime is bounded by `ArtifactCache::sweep`, which the server
//! drives on an interval.

mod cache;
mod disk;
mod store;
mod types;

pub use cache::{ArtifactCache, EvictionPolicy, SweepReport};
pub use disk::DiskArtifactStore;
pub use store::{ArtifactStore, MemoryArtifactStore, DEFAULT_MEMORY_CAPACITY};
pub use types::{Artifact, ArtifactKey, ArtifactMeta};
