//! End-to-end citation pipeline tests over a generated guide.pdf

mod common;

use citation_proof_server::citation::locate;
use citation_proof_server::document::MatchResult;
use citation_proof_server::highlight::render_match;
use citation_proof_server::mupdf::{extract_blocks, StextOptions};

use common::{app_state, documents_dir, floats, guide_pdf, highlights_on, LYMPHOMA_SENTENCE};

const PAGE_HEIGHT: f32 = 792.0;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn search(data: &[u8], citation: &str) -> MatchResult {
    let blocks = extract_blocks(data, &StextOptions::default()).unwrap();
    locate(&blocks, citation)
}

#[test]
fn test_extraction_is_repeatable() {
    let data = guide_pdf();
    let first = extract_blocks(&data, &StextOptions::default()).unwrap();
    let second = extract_blocks(&data, &StextOptions::default()).unwrap();
    assert_eq!(first, second);

    let pages: Vec<usize> = first.iter().map(|b| b.page_number).collect();
    let mut sorted = pages.clone();
    sorted.sort();
    assert_eq!(pages, sorted);
    assert!(first.iter().any(|b| b.page_number == 2 && b.text.contains(LYMPHOMA_SENTENCE)));
}

#[test]
fn test_case_folded_match_on_page_two() {
    let result = search(&guide_pdf(), "stage III lymphoma");

    assert!(result.found);
    assert_eq!(result.page_number, Some(2));
    // "III" folds to "iii", so all three words are shared
    assert_eq!(result.score, 3);
    assert!(result.block_text.as_deref().unwrap().contains(LYMPHOMA_SENTENCE));
}

#[test]
fn test_highlight_covers_block_rect() {
    let data = guide_pdf();
    let result = search(&data, "stage III lymphoma");
    let rect = result.rect.unwrap();

    let artifact = render_match(&data, &result).unwrap();

    assert!(highlights_on(&artifact, 1).is_empty());
    assert!(highlights_on(&artifact, 3).is_empty());
    let annots = highlights_on(&artifact, 2);
    assert_eq!(annots.len(), 1);

    // Unrotated page: user space is page space flipped vertically
    let annot_rect = floats(&annots[0], b"Rect");
    assert_close(annot_rect[0], rect.x);
    assert_close(annot_rect[1], PAGE_HEIGHT - rect.bottom());
    assert_close(annot_rect[2], rect.right());
    assert_close(annot_rect[3], PAGE_HEIGHT - rect.y);

    // The text baseline sits inside the highlight
    assert!(annot_rect[1] < 400.0 && annot_rect[3] > 400.0);
}

#[test]
fn test_render_is_idempotent() {
    let data = guide_pdf();
    let result = search(&data, "stage III lymphoma");

    let first = render_match(&data, &result).unwrap();
    let second = render_match(&data, &result).unwrap();

    let again_first = search(&first, "stage III lymphoma");
    let again_second = search(&second, "stage III lymphoma");
    assert_eq!(again_first.page_number, result.page_number);
    assert_eq!(again_first.score, result.score);
    assert_eq!(again_first, again_second);
}

#[test]
fn test_unrelated_phrase_not_found() {
    let result = search(&guide_pdf(), "unrelated phrase not in document");
    assert!(!result.found);
    assert_eq!(result, MatchResult::not_found());
}

#[test]
fn test_empty_citation_not_found() {
    let result = search(&guide_pdf(), "   ");
    assert!(!result.found);
}

#[tokio::test]
async fn test_cache_round_trip() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());

    let first = state
        .artifacts()
        .get_or_create("guide.pdf", "stage III lymphoma")
        .await
        .unwrap()
        .unwrap();
    let second = state
        .artifacts()
        .get_or_create("guide.pdf", "stage III lymphoma")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.meta, second.meta);
    assert_eq!(highlights_on(&second.data, 2).len(), 1);
    assert_eq!(store.len(), 1);

    let missing = state
        .artifacts()
        .get_or_create("guide.pdf", "unrelated phrase not in document")
        .await
        .unwrap();
    assert!(missing.is_none());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_original_document_untouched() {
    let dir = documents_dir();
    let before = std::fs::read(dir.path().join("guide.pdf")).unwrap();
    let (state, _store) = app_state(dir.path());

    state
        .artifacts()
        .get_or_create("guide.pdf", "stage III lymphoma")
        .await
        .unwrap();

    let after = std::fs::read(dir.path().join("guide.pdf")).unwrap();
    assert_eq!(before, after);
}
