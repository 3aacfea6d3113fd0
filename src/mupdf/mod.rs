//! Low-level MuPDF access
//!
//! MuPDF's `fz_context` is not thread-safe, so every call here opens a fresh
//! document from bytes and drops it before returning. Callers run these
//! functions on the blocking pool (see `citation::CitationService`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use citation_proof_server::mupdf::{extract_blocks, StextOptions};
//!
//! let blocks = extract_blocks(&pdf_bytes, &StextOptions::default())?;
//! for block in &blocks {
//!     println!("page {} block {}: {:?}", block.page_number, block.index, block.rect);
//! }
//! ```

mod blocks;

pub use blocks::{extract_blocks, extract_page_blocks, page_count, StextOptions};
