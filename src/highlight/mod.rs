//! Highlight rendering
//!
//! Produces the proof artifact: a copy of the source PDF with a single
//! highlight annotation placed exactly over the matched block.

mod geometry;
mod renderer;

pub use geometry::{effective_box, snap_rotation, PageFrame, Point, Quad};
pub use renderer::{
    render_highlight, render_match, HighlightStyle, HIGHLIGHT_NAME, HIGHLIGHT_STYLE,
};
