//! HTML output
//!
//! Page-anchored reconstruction of a document's text and the pdf.js viewer
//! pages served under `/view`.

pub mod pages;
pub mod viewer;

pub use pages::{blocks_to_text, build_document_html, pages_from_blocks, PageText};
pub use viewer::{highlighted_url, not_found_page, viewer_page};
