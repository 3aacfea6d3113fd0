//! Page-anchored HTML reconstruction
//!
//! One `<div id="page-N">` per page so a citation can link to `#page-N`
//! without the PDF.

use std::collections::BTreeMap;

use crate::document::Block;

/// Plain text of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based
    pub number: usize,
    pub text: String,
}

/// Concatenate block text per page, in document order
pub fn pages_from_blocks(blocks: &[Block]) -> Vec<PageText> {
    let mut pages: BTreeMap<usize, Vec<&Block>> = BTreeMap::new();
    for block in blocks {
        pages.entry(block.page_number).or_default().push(block);
    }

    pages
        .into_iter()
        .map(|(number, mut page_blocks)| {
            page_blocks.sort_by_key(|b| b.index);
            let text = page_blocks
                .iter()
                .map(|b| b.text.trim_end())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n");
            PageText { number, text }
        })
        .collect()
}

/// Blocks as markdown-ish text: one paragraph per non-empty block
pub fn blocks_to_text(blocks: &[Block]) -> String {
    let mut ordered: Vec<&Block> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.position());
    ordered
        .iter()
        .map(|b| b.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Standalone HTML document with one anchored block per non-empty page
pub fn build_document_html(title: &str, pages: &[PageText]) -> String {
    let blocks: Vec<String> = pages
        .iter()
        .filter(|page| !page.text.trim().is_empty())
        .map(|page| {
            format!(
                "<div id=\"page-{n}\" class=\"page-block\">\n  <a href=\"#page-{n}\" class=\"page-link\">#</a>\n  <pre>{text}</pre>\n</div>",
                n = page.number,
                text = html_escape::encode_text(&page.text),
            )
        })
        .collect();

    let title = html_escape::encode_text(title);
    if blocks.is_empty() {
        return format!(
            "<!DOCTYPE html>\n<html><body><p>No content for document {}</p></body></html>\n",
            title
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        html {{ scroll-behavior: smooth; }}
        body {{ font-family: Arial, sans-serif; margin: 20px; background-color: #f9f9f9; }}
        .page-block {{
            padding: 20px;
            margin-bottom: 10px;
            background-color: #fff;
            border: 1px solid #ddd;
            border-radius: 5px;
            scroll-margin-top: 16px;
        }}
        .page-block pre {{ white-space: pre-wrap; word-wrap: break-word; }}
        .page-block:target {{ border-color: #007bff; background-color: #e7f1ff; }}
        .page-link {{ float: right; color: #666; text-decoration: none; }}
    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = title,
        body = blocks.join("\n"),
    )
}
