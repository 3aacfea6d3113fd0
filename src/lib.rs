//! Citation Proof Server Library
//!
//! Locates a quoted citation inside a PDF and proves it by serving a copy of
//! the document with the matching block highlighted. The main server binary
//! is in main.rs.
//!
//! # Modules
//!
//! - `document`: blocks, match results, error taxonomy, backing store
//! - `mupdf`: block extraction over MuPDF structured text
//! - `citation`: word-set matcher and the citation service
//! - `highlight`: highlight annotation rendering
//! - `artifacts`: cache of rendered proofs and its eviction sweep
//! - `anchors`: deterministic paragraph anchors for text reconstructions
//! - `html`, `routes`: the HTTP surface

pub mod anchors;
pub mod artifacts;
pub mod citation;
pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod html;
pub mod mupdf;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_pdf;

pub use routes::build_router;
pub use state::AppState;
