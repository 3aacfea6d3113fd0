//! Document model and backing store
//!
//! A document is a paginated PDF payload owned by the backing store. The
//! citation pipeline reads it, segments it into positioned text blocks, and
//! derives highlighted copies without ever touching the original bytes.
//!
//! # Architecture
//!
//! ```text
//!   DocumentStore ──fetch──▶ bytes ──mupdf::extract_blocks──▶ Vec<Block>
//!                                                              │
//!                                           citation::locate ◀─┘
//!                                                  │
//!                                             MatchResult
//! ```

mod error;
mod store;
mod types;

pub use error::{DocumentError, DocumentResult, Result};
pub use store::{DocumentStore, FsDocumentStore};
pub use types::{has_pdf_header, Block, MatchResult, Rect};
