//! Core document types
//!
//! Positioned text blocks and the transient match result built from them.

use serde::{Deserialize, Serialize};

/// Number of leading bytes searched for the `%PDF` header
const PDF_HEADER_WINDOW: usize = 1024;

/// Check whether a payload carries a PDF header
///
/// PDF readers accept a small amount of junk before `%PDF`, so the marker is
/// looked for in the first kilobyte rather than only at offset 0.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Rectangle in page space (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Left, top, right, bottom
    pub fn to_ltrb(&self) -> [f32; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// Finite coordinates and a non-negative extent
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// A contiguous unit of text as segmented by the source layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based page number
    pub page_number: usize,
    /// Position of the block within its page, in source order
    pub index: usize,
    /// Block text, lines separated by `\n`
    pub text: String,
    /// Bounding rectangle in page space
    pub rect: Rect,
}

impl Block {
    pub fn new(page_number: usize, index: usize, text: impl Into<String>, rect: Rect) -> Self {
        Self {
            page_number,
            index,
            text: text.into(),
            rect,
        }
    }

    /// Document-order sort key
    pub fn position(&self) -> (usize, usize) {
        (self.page_number, self.index)
    }
}

/// Best-matching block for a citation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub found: bool,
    pub block_text: Option<String>,
    pub page_number: Option<usize>,
    pub score: usize,
    pub rect: Option<Rect>,
}

impl MatchResult {
    /// Result for a citation that shares no words with any block
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Result pointing at `block`
    pub fn from_block(block: &Block, score: usize) -> Self {
        Self {
            found: true,
            block_text: Some(block.text.clone()),
            page_number: Some(block.page_number),
            score,
            rect: Some(block.rect),
        }
    }
}
