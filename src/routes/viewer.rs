//! Browser-facing viewer

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use super::documents::CitationQuery;
use crate::error::Result;
use crate::html::{not_found_page, viewer_page};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:key", get(view_document))
}

/// pdf.js page opened at the match, or a not-found page (404)
async fn view_document(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<CitationQuery>,
) -> Result<Response> {
    let citation = query.citation()?;
    let result = state.citations().search(&key, &citation).await?;

    if !result.found {
        return Ok((StatusCode::NOT_FOUND, Html(not_found_page(&key, &citation))).into_response());
    }
    Ok(Html(viewer_page(&key, &citation, &result)).into_response())
}
