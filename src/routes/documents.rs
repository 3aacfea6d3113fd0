//! Document endpoints
//!
//! Citation search, highlighted proofs and text reconstructions of the
//! documents in the backing store.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::html::{blocks_to_text, build_document_html, pages_from_blocks};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/:key/search", get(search_document))
        .route("/:key/highlighted", get(highlighted_document))
        .route("/:key/text", get(anchored_text))
        .route("/:key/pages", get(page_html))
}

/// `?q=<citation>`
#[derive(Debug, Deserialize)]
pub struct CitationQuery {
    pub q: Option<String>,
}

impl CitationQuery {
    pub fn citation(self) -> Result<String> {
        self.q
            .ok_or_else(|| AppError::BadRequest("missing query parameter 'q'".into()))
    }
}

#[derive(Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub found: bool,
    /// -1 when nothing matched
    pub page_number: i64,
    pub score: usize,
    pub block_text: Option<String>,
    /// `[x0, y0, x1, y1]` in page space
    pub block_rect: Option<[f32; 4]>,
    pub search_text: String,
}

async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents = state.documents().list().await?;
    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}

async fn search_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<CitationQuery>,
) -> Result<Json<SearchResponse>> {
    let citation = query.citation()?;
    let result = state.citations().search(&key, &citation).await?;

    Ok(Json(SearchResponse {
        found: result.found,
        page_number: result
            .page_number
            .and_then(|p| i64::try_from(p).ok())
            .unwrap_or(-1),
        score: result.score,
        block_text: result.block_text,
        block_rect: result.rect.map(|r| r.to_ltrb()),
        search_text: citation,
    }))
}

/// File name safe to quote in `Content-Disposition`
fn disposition_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

async fn highlighted_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<CitationQuery>,
) -> Result<Response> {
    let citation = query.citation()?;
    let artifact = state
        .artifacts()
        .get_or_create(&key, &citation)
        .await?
        .ok_or_else(|| AppError::NotFound("Highlighted PDF not found".into()))?;

    let disposition = format!("inline; filename=\"highlighted_{}\"", disposition_name(&key));
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(artifact.data),
    )
        .into_response())
}

async fn anchored_text(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let blocks = state.citations().blocks(&key).await?;
    let text = state.anchors().process(&blocks_to_text(&blocks));

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        text,
    )
        .into_response())
}

async fn page_html(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response> {
    let blocks = state.citations().blocks(&key).await?;
    let title = key
        .strip_suffix(".pdf")
        .or_else(|| key.strip_suffix(".PDF"))
        .unwrap_or(&key);
    let html = build_document_html(title, &pages_from_blocks(&blocks));

    Ok(axum::response::Html(html).into_response())
}
