//! Block extraction over MuPDF structured text
//!
//! Turns a PDF payload into the ordered `(page, block text, rect)` sequence the
//! matcher scans. Segmentation and rectangles are MuPDF's own; nothing is
//! re-sorted or merged here, and empty blocks are kept.

use mupdf::{Document, Page, TextPageOptions};

use crate::document::{has_pdf_header, Block, DocumentError, Rect, Result};

const PDF_MIME: &str = "application/pdf";

/// Options for structured text extraction
#[derive(Debug, Clone)]
pub struct StextOptions {
    /// Preserve whitespace
    pub preserve_whitespace: bool,
    /// Preserve ligatures
    pub preserve_ligatures: bool,
    /// Inhibit spaces between characters
    pub inhibit_spaces: bool,
}

impl Default for StextOptions {
    /// Same flags a "blocks" text dump uses: ligatures and whitespace kept.
    fn default() -> Self {
        Self {
            preserve_whitespace: true,
            preserve_ligatures: true,
            inhibit_spaces: false,
        }
    }
}

impl StextOptions {
    /// Convert to MuPDF TextPageOptions
    pub fn to_mupdf_options(&self) -> TextPageOptions {
        let mut opts = TextPageOptions::empty();

        if self.preserve_whitespace {
            opts |= TextPageOptions::PRESERVE_WHITESPACE;
        }
        if self.preserve_ligatures {
            opts |= TextPageOptions::PRESERVE_LIGATURES;
        }
        if self.inhibit_spaces {
            opts |= TextPageOptions::INHIBIT_SPACES;
        }

        opts
    }
}

/// Open a PDF payload, mapping every failure to `DocumentUnreadable`
fn open_pdf(data: &[u8]) -> Result<Document> {
    if !has_pdf_header(data) {
        return Err(DocumentError::DocumentUnreadable(
            "missing %PDF header".into(),
        ));
    }
    Document::from_bytes(data, PDF_MIME).map_err(|e| DocumentError::DocumentUnreadable(e.to_string()))
}

/// Count the pages of a PDF payload
pub fn page_count(data: &[u8]) -> Result<usize> {
    let doc = open_pdf(data)?;
    Ok(doc.page_count()? as usize)
}

/// Extract every block of every page, in document order
pub fn extract_blocks(data: &[u8], options: &StextOptions) -> Result<Vec<Block>> {
    let doc = open_pdf(data)?;
    let count = doc.page_count()?;

    let mut blocks = Vec::new();
    for page_index in 0..count {
        let page = doc.load_page(page_index)?;
        let page_blocks = extract_page_blocks(&page, page_index as usize + 1, options)?;
        blocks.extend(page_blocks);
    }

    tracing::debug!(pages = count, blocks = blocks.len(), "Extracted text blocks");
    Ok(blocks)
}

/// Extract the blocks of a single page
///
/// `page_number` is 1-based and is stamped onto each block.
pub fn extract_page_blocks(
    page: &Page,
    page_number: usize,
    options: &StextOptions,
) -> Result<Vec<Block>> {
    let text_page = page.to_text_page(options.to_mupdf_options())?;

    let mut blocks = Vec::new();
    for (index, block) in text_page.blocks().enumerate() {
        let bounds = block.bounds();
        let rect = Rect::from_ltrb(bounds.x0, bounds.y0, bounds.x1, bounds.y1);

        let mut text = String::new();
        for line in block.lines() {
            for ch in line.chars() {
                if let Some(c) = ch.char() {
                    text.push(c);
                }
            }
            text.push('\n');
        }

        blocks.push(Block::new(page_number, index, text, rect));
    }

    Ok(blocks)
}
