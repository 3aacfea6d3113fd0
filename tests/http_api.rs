//! HTTP surface tests driven through `tower::ServiceExt::oneshot`

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use citation_proof_server::build_router;

use common::{app_state, documents_dir, highlights_on};

const LYMPHOMA_QUERY: &str = "stage%20III%20lymphoma";

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_documents() {
    let dir = documents_dir();
    std::fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(&app, "/api/v1/documents").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0], "guide.pdf");
}

#[tokio::test]
async fn test_search_found() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(
        &app,
        &format!("/api/v1/documents/guide.pdf/search?q={}", LYMPHOMA_QUERY),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["page_number"], 2);
    assert_eq!(body["score"], 3);
    assert_eq!(body["search_text"], "stage III lymphoma");
    assert!(body["block_text"].as_str().unwrap().contains("lymphoma"));
    assert_eq!(body["block_rect"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_search_not_found() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(
        &app,
        "/api/v1/documents/guide.pdf/search?q=unrelated%20phrase%20not%20in%20document",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["page_number"], -1);
    assert_eq!(body["score"], 0);
    assert!(body["block_text"].is_null());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(&app, "/api/v1/documents/guide.pdf/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_unknown_document_is_404() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(&app, "/api/v1/documents/absent.pdf/search?q=anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_unreadable_document_is_422() {
    let dir = documents_dir();
    std::fs::write(dir.path().join("broken.pdf"), b"PK\x03\x04 not a pdf").unwrap();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, body) = get_json(&app, "/api/v1/documents/broken.pdf/search?q=anything").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "unreadable_document");
}

#[tokio::test]
async fn test_highlighted_pdf() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());
    let app = build_router(state);

    let (status, headers, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/documents/guide.pdf/highlighted?q={}", LYMPHOMA_QUERY),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "inline; filename=\"highlighted_guide.pdf\""
    );
    assert!(body.starts_with(b"%PDF"));
    assert_eq!(highlights_on(&body, 2).len(), 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_highlighted_no_match_is_404_and_uncached() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());
    let app = build_router(state);

    let (status, _, body) = send(
        &app,
        Method::GET,
        "/api/v1/documents/guide.pdf/highlighted?q=unrelated%20phrase%20not%20in%20document",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Highlighted PDF not found");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_highlighted_after_document_deleted_is_404() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());
    let app = build_router(state);
    let uri = format!("/api/v1/documents/guide.pdf/highlighted?q={}", LYMPHOMA_QUERY);

    let (status, _, _) = send(&app, Method::GET, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len(), 1);

    std::fs::remove_file(dir.path().join("guide.pdf")).unwrap();

    let (status, _, body) = send(&app, Method::GET, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "not_found");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_artifact_listing_and_eviction() {
    let dir = documents_dir();
    let (state, store) = app_state(dir.path());
    let app = build_router(state);

    send(
        &app,
        Method::GET,
        &format!("/api/v1/documents/guide.pdf/highlighted?q={}", LYMPHOMA_QUERY),
    )
    .await;

    let (status, body) = get_json(&app, "/api/v1/artifacts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["artifacts"][0]["key"]["document"], "guide.pdf");
    assert_eq!(body["artifacts"][0]["key"]["citation"], "stage III lymphoma");
    assert_eq!(body["artifacts"][0]["page_number"], 2);

    let evict_uri = format!("/api/v1/artifacts?document=guide.pdf&q={}", LYMPHOMA_QUERY);
    let (status, _, _) = send(&app, Method::DELETE, &evict_uri).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.is_empty());

    let (status, _, _) = send(&app, Method::DELETE, &evict_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sweep_endpoint() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, _, body) = send(&app, Method::POST, "/api/v1/artifacts/sweep").await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["examined"], 0);
    assert_eq!(report["remaining"], 0);
}

#[tokio::test]
async fn test_anchored_text() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, headers, body) = send(&app, Method::GET, "/api/v1/documents/guide.pdf/text").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert!(text.starts_with("<!-- paragraph-1 -->\n<div id=\"paragraph-1\"></div>\n"));
    assert!(text.contains(common::LYMPHOMA_SENTENCE));
}

#[tokio::test]
async fn test_page_reconstruction() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, _, body) = send(&app, Method::GET, "/api/v1/documents/guide.pdf/pages").await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    for page in 1..=3 {
        assert!(html.contains(&format!("id=\"page-{}\"", page)));
    }
    assert!(html.contains("<title>guide</title>"));
}

#[tokio::test]
async fn test_viewer_pages() {
    let dir = documents_dir();
    let (state, _) = app_state(dir.path());
    let app = build_router(state);

    let (status, _, body) = send(&app, Method::GET, &format!("/view/guide.pdf?q={}", LYMPHOMA_QUERY)).await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("const foundPage = 2;"));
    assert!(html.contains("/api/v1/documents/guide.pdf/highlighted?q=stage%20III%20lymphoma"));

    let (status, _, body) = send(&app, Method::GET, "/view/guide.pdf?q=xylophone").await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Citation not found"));
}
