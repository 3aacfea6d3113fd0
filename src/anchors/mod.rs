//! Paragraph anchors
//!
//! Numbers the non-heading paragraphs of a markdown text stream so a citation
//! id resolves to the same element on every run. Two passes:
//!
//! 1. `label` puts `<!-- paragraph-N -->` on its own line before every
//!    non-heading block. Blocks are separated by blank lines; a block whose
//!    first non-whitespace character is `#` is a heading and takes no number.
//! 2. `anchor` adds `<div id="paragraph-N"></div>` on the line after every
//!    marker, giving links something to land on.
//!
//! Both passes are idempotent: a block that already carries a marker keeps it
//! (and its number), and a marker already followed by its element is left
//! alone.

use regex::Regex;
use thiserror::Error;

/// Markdown heading marker
const HEADING_MARKER: char = '#';

/// One or more blank lines between blocks
const BLOCK_SEPARATOR: &str = r"\r?\n(?:[ \t]*\r?\n)+";

pub const DEFAULT_PREFIX: &str = "paragraph";

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("Invalid anchor prefix {0:?}: use ASCII letters, digits, '-' or '_'")]
    InvalidPrefix(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Anchor naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOptions {
    /// Id prefix; ids are `{prefix}-{n}`
    pub prefix: String,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Labels and anchors paragraphs for one prefix
#[derive(Debug, Clone)]
pub struct AnchorProcessor {
    prefix: String,
    separator: Regex,
    /// Marker at the start of a block, capturing its number
    block_marker: Regex,
    /// Marker anywhere in a line, capturing its number
    line_marker: Regex,
}

impl AnchorProcessor {
    pub fn new(options: AnchorOptions) -> Result<Self, AnchorError> {
        let prefix = options.prefix;
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AnchorError::InvalidPrefix(prefix));
        }

        let marker = format!(r"<!--\s*{}-(\d+)\s*-->", regex::escape(&prefix));
        Ok(Self {
            separator: Regex::new(BLOCK_SEPARATOR)?,
            block_marker: Regex::new(&format!(r"\A\s*{}", marker))?,
            line_marker: Regex::new(&marker)?,
            prefix,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn marker(&self, n: usize) -> String {
        format!("<!-- {}-{} -->", self.prefix, n)
    }

    fn element(&self, n: &str) -> String {
        format!(r#"<div id="{}-{}"></div>"#, self.prefix, n)
    }

    /// Insert a marker before every non-heading block
    pub fn label(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        let mut counter = 0usize;
        let mut last = 0usize;

        for separator in self.separator.find_iter(text) {
            self.label_block(&text[last..separator.start()], &mut counter, &mut out);
            out.push_str(separator.as_str());
            last = separator.end();
        }
        self.label_block(&text[last..], &mut counter, &mut out);

        out
    }

    fn label_block(&self, block: &str, counter: &mut usize, out: &mut String) {
        let content = block.trim_start();
        if content.is_empty() {
            out.push_str(block);
            return;
        }

        if let Some(caps) = self.block_marker.captures(block) {
            if let Ok(n) = caps[1].parse::<usize>() {
                *counter = (*counter).max(n);
            }
            out.push_str(block);
            return;
        }

        if content.starts_with(HEADING_MARKER) {
            out.push_str(block);
            return;
        }

        *counter += 1;
        out.push_str(&self.marker(*counter));
        out.push('\n');
        out.push_str(block);
    }

    /// Insert the addressable element after every marker line
    pub fn anchor(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let mut out = String::with_capacity(text.len() + text.len() / 4);

        for (i, line) in lines.iter().enumerate() {
            out.push_str(line);

            let Some(caps) = self.line_marker.captures(line) else {
                continue;
            };
            let element = self.element(&caps[1]);
            let present = lines
                .get(i + 1)
                .is_some_and(|next| next.trim() == element);
            if present {
                continue;
            }

            if line.ends_with('\n') {
                out.push_str(&element);
                out.push('\n');
            } else {
                out.push('\n');
                out.push_str(&element);
            }
        }

        out
    }

    /// `label` then `anchor`
    pub fn process(&self, text: &str) -> String {
        self.anchor(&self.label(text))
    }
}
