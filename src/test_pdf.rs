//! Tiny PDF builder and inspectors shared by unit and integration tests
//!
//! Integration tests pull this file in through `#[path]`, so it only uses
//! `lopdf`.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text at `(x, y)` in PDF user space
pub type Line<'a> = (f32, f32, &'a str);

/// Build a Letter-sized PDF with one Helvetica line per entry, page by page
pub fn text_pdf(pages: &[&[Line<'_>]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (x, y, text) in lines.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap_or_default(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Sentence the guide scenario looks for on page 2
pub const LYMPHOMA_SENTENCE: &str = "patients with stage III lymphoma require chemotherapy";

/// Three pages; page 2 carries the lymphoma sentence far from its neighbour
pub fn guide_pdf() -> Vec<u8> {
    text_pdf(&[
        &[(72.0, 700.0, "Introduction to clinical oncology guidelines")],
        &[
            (72.0, 700.0, "Dosage tables for adult patients"),
            (72.0, 400.0, LYMPHOMA_SENTENCE),
        ],
        &[(72.0, 700.0, "Appendix and references")],
    ])
}

/// Highlight annotations on 1-based `page_number`
pub fn highlights_on(data: &[u8], page_number: u32) -> Vec<lopdf::Dictionary> {
    let doc = Document::load_mem(data).unwrap();
    let page_id = doc.get_pages()[&page_number];
    let page = doc.get_dictionary(page_id).unwrap();
    let annots = match page.get(b"Annots") {
        Ok(Object::Reference(id)) => doc.get_object(*id).unwrap().as_array().unwrap().clone(),
        Ok(Object::Array(items)) => items.clone(),
        _ => return Vec::new(),
    };
    annots
        .iter()
        .filter_map(|a| match a {
            Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
            Object::Dictionary(d) => Some(d.clone()),
            _ => None,
        })
        .filter(|d| {
            d.get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|n| n == b"Highlight")
                .unwrap_or(false)
        })
        .collect()
}

/// Numeric array entry of a dictionary
pub fn floats(dict: &lopdf::Dictionary, key: &[u8]) -> Vec<f32> {
    dict.get(key)
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}
