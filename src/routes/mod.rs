//! HTTP routes

pub mod artifacts;
pub mod documents;
pub mod health;
pub mod viewer;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router with tracing and permissive CORS
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/documents", documents::router())
        .nest("/api/v1/artifacts", artifacts::router())
        .nest("/view", viewer::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
