//! Citation lookup
//!
//! `matcher` is the pure word-set overlap scorer; `service` wires it to the
//! document store, the block extractor and the highlight renderer.

mod matcher;
mod service;

pub use matcher::{locate, overlap_score, word_set};
pub use service::{CitationService, Proof, DEFAULT_TIMEOUT_SECS};
