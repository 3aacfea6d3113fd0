//! Artifact cache endpoints
//!
//! Listing, delete-by-key and an on-demand sweep, for whatever drives
//! cleanup outside the server.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactKey, ArtifactMeta, SweepReport};
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_artifacts).delete(evict_artifact))
        .route("/sweep", post(sweep_artifacts))
}

#[derive(Serialize)]
pub struct ArtifactListResponse {
    pub artifacts: Vec<ArtifactMeta>,
    pub total: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct EvictQuery {
    pub document: String,
    pub q: String,
}

async fn list_artifacts(State(state): State<AppState>) -> Result<Json<ArtifactListResponse>> {
    let artifacts = state.artifacts().entries().await?;
    Ok(Json(ArtifactListResponse {
        total: artifacts.len(),
        total_bytes: artifacts.iter().map(|a| a.size as u64).sum(),
        artifacts,
    }))
}

async fn evict_artifact(
    State(state): State<AppState>,
    Query(query): Query<EvictQuery>,
) -> Result<StatusCode> {
    let key = ArtifactKey::new(query.document, query.q);
    if state.artifacts().evict(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Artifact not found".into()))
    }
}

async fn sweep_artifacts(State(state): State<AppState>) -> Result<Json<SweepReport>> {
    let report = state.artifacts().sweep(state.eviction()).await?;
    Ok(Json(report))
}
