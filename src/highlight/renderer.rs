//! Highlight annotation writer
//!
//! Loads a private copy of the PDF, adds one `/Highlight` annotation over a
//! block rectangle and serializes the result. The caller's bytes are never
//! modified.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::geometry::{effective_box, PageFrame, Quad};
use crate::document::{DocumentError, MatchResult, Rect, Result};

/// Guard against cyclic `/Parent` chains
const MAX_TREE_DEPTH: usize = 32;

/// MuPDF's fallback page size when a page carries no usable MediaBox
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Annotation name stamped on every highlight
pub const HIGHLIGHT_NAME: &str = "citation-highlight";

/// Visual style of the highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    /// RGB, 0.0 to 1.0
    pub color: [f32; 3],
    /// Fill alpha
    pub fill_opacity: f32,
    /// Stroke alpha
    pub stroke_opacity: f32,
    /// Border width in points
    pub border_width: f32,
}

/// Solid yellow stroke over a translucent yellow fill
pub const HIGHLIGHT_STYLE: HighlightStyle = HighlightStyle {
    color: [1.0, 1.0, 0.0],
    fill_opacity: 0.3,
    stroke_opacity: 1.0,
    border_width: 1.0,
};

/// Render the block a match points at
///
/// The no-match path must stop before this; a result without a page or rect
/// is a caller bug and yields `InvalidRect`.
pub fn render_match(data: &[u8], result: &MatchResult) -> Result<Vec<u8>> {
    match (result.found, result.page_number, result.rect) {
        (true, Some(page_number), Some(rect)) => render_highlight(data, page_number, rect),
        _ => Err(DocumentError::InvalidRect(
            "render requested without a matched block".into(),
        )),
    }
}

/// Add a highlight over `rect` on 1-based `page_number`
pub fn render_highlight(data: &[u8], page_number: usize, rect: Rect) -> Result<Vec<u8>> {
    if !rect.is_valid() {
        return Err(DocumentError::InvalidRect(format!("{:?}", rect)));
    }

    let mut doc = Document::load_mem(data)
        .map_err(|e| DocumentError::RenderFailed(format!("Failed to load PDF: {}", e)))?;

    let pages = doc.get_pages();
    let page_id = u32::try_from(page_number)
        .ok()
        .and_then(|n| pages.get(&n).copied())
        .ok_or_else(|| {
            DocumentError::RenderFailed(format!(
                "Page {} not found (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

    let frame = page_frame(&doc, page_id);
    let quad = frame.quad(&rect);
    let bounds = quad.bounds();

    let appearance_id = doc.add_object(appearance_stream(bounds, &HIGHLIGHT_STYLE));
    let annot_id = doc.add_object(highlight_annotation(
        page_id,
        &quad,
        appearance_id,
        &HIGHLIGHT_STYLE,
    ));
    attach_annotation(&mut doc, page_id, annot_id)?;

    let mut output = Vec::with_capacity(data.len() + 1024);
    doc.save_to(&mut output)
        .map_err(|e| DocumentError::RenderFailed(format!("Failed to save PDF: {}", e)))?;

    tracing::debug!(
        page = page_number,
        rotation = frame.rotation,
        bytes = output.len(),
        "Rendered highlight"
    );
    Ok(output)
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn highlight_annotation(
    page_id: ObjectId,
    quad: &Quad,
    appearance_id: ObjectId,
    style: &HighlightStyle,
) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => reals(&quad.bounds()),
        "QuadPoints" => reals(&quad.points()),
        "C" => reals(&style.color),
        "CA" => style.fill_opacity,
        "F" => 4,
        "P" => page_id,
        "NM" => Object::string_literal(HIGHLIGHT_NAME),
        "BS" => dictionary! {
            "W" => style.border_width,
            "S" => "S",
        },
        "AP" => dictionary! {
            "N" => appearance_id,
        },
    }
}

fn appearance_stream(bounds: [f32; 4], style: &HighlightStyle) -> Stream {
    let [x0, y0, x1, y1] = bounds;
    let inset = style.border_width / 2.0;
    let width = (x1 - x0 - style.border_width).max(0.0);
    let height = (y1 - y0 - style.border_width).max(0.0);
    let [r, g, b] = style.color;

    let content = format!(
        "q\n/GS0 gs\n{r:.3} {g:.3} {b:.3} rg\n{r:.3} {g:.3} {b:.3} RG\n{w:.2} w\n{x:.2} {y:.2} {width:.2} {height:.2} re\nB\nQ\n",
        r = r,
        g = g,
        b = b,
        w = style.border_width,
        x = x0 + inset,
        y = y0 + inset,
        width = width,
        height = height,
    );

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => reals(&bounds),
        "Resources" => dictionary! {
            "ExtGState" => dictionary! {
                "GS0" => dictionary! {
                    "Type" => "ExtGState",
                    "ca" => style.fill_opacity,
                    "CA" => style.stroke_opacity,
                    "BM" => "Multiply",
                },
            },
        },
    };

    Stream::new(dict, content.into_bytes())
}

/// Append the annotation to the page's `/Annots`, wherever that array lives
fn attach_annotation(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<()> {
    let existing = doc.get_dictionary(page_id)?.get(b"Annots").ok().cloned();

    match existing {
        Some(Object::Reference(array_id)) => {
            doc.get_object_mut(array_id)?
                .as_array_mut()?
                .push(Object::Reference(annot_id));
        }
        Some(Object::Array(mut items)) => {
            items.push(Object::Reference(annot_id));
            doc.get_object_mut(page_id)?
                .as_dict_mut()?
                .set("Annots", items);
        }
        _ => {
            doc.get_object_mut(page_id)?
                .as_dict_mut()?
                .set("Annots", vec![Object::Reference(annot_id)]);
        }
    }

    Ok(())
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Look up a page attribute, following `/Parent` for inheritable keys
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn read_box(doc: &Document, object: &Object) -> Option<[f32; 4]> {
    let items = object.as_array().ok()?;
    if items.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = resolve(doc, item)?.as_float().ok()?;
    }
    values.iter().all(|v| v.is_finite()).then_some(values)
}

/// Effective box and rotation of a page, the way MuPDF sees it
fn page_frame(doc: &Document, page_id: ObjectId) -> PageFrame {
    let media = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| read_box(doc, obj))
        .filter(|b| b[0] != b[2] && b[1] != b[3])
        .unwrap_or(DEFAULT_MEDIA_BOX);
    let crop = inherited(doc, page_id, b"CropBox").and_then(|obj| read_box(doc, obj));
    let rotation = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0);

    PageFrame::new(effective_box(media, crop), rotation)
}
