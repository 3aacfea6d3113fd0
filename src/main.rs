//! Citation Proof Server
//!
//! Serves citation lookups and highlighted PDF proofs over a directory of
//! documents.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citation_proof_server::anchors::{AnchorOptions, AnchorProcessor};
use citation_proof_server::artifacts::{
    ArtifactCache, ArtifactStore, DiskArtifactStore, EvictionPolicy, MemoryArtifactStore,
};
use citation_proof_server::config::{ArtifactBackend, Config};
use citation_proof_server::document::{DocumentStore, FsDocumentStore};
use citation_proof_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citation_proof_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Citation Proof Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Documents directory: {}", config.documents.dir.display());

    tokio::fs::create_dir_all(&config.documents.dir)
        .await
        .with_context(|| format!("creating {}", config.documents.dir.display()))?;
    let documents: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(&config.documents.dir));

    let artifact_store: Arc<dyn ArtifactStore> = match config.artifacts.backend {
        ArtifactBackend::Disk => {
            tokio::fs::create_dir_all(&config.artifacts.dir)
                .await
                .with_context(|| format!("creating {}", config.artifacts.dir.display()))?;
            tracing::info!("Artifact store: disk at {}", config.artifacts.dir.display());
            Arc::new(DiskArtifactStore::new(&config.artifacts.dir))
        }
        ArtifactBackend::Memory => {
            tracing::info!(
                "Artifact store: memory, {} entries",
                config.artifacts.memory_capacity
            );
            Arc::new(MemoryArtifactStore::new(config.artifacts.memory_capacity))
        }
    };

    let anchors = AnchorProcessor::new(AnchorOptions::default())?;
    let policy = config.artifacts.eviction_policy();
    let app_state = AppState::new(
        documents,
        artifact_store,
        anchors,
        policy.clone(),
        config.server.request_timeout_secs,
    );

    if let Some(interval) = config.artifacts.sweep_interval() {
        if policy.is_unbounded() {
            tracing::info!("Artifact sweeper disabled: no eviction limits configured");
        } else {
            tokio::spawn(run_sweeper(app_state.artifacts().clone(), policy, interval));
        }
    }

    let app = build_router(app_state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.server.host, config.server.port))?;
    tracing::info!("Citation Proof Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Periodically apply the eviction policy to the artifact cache
async fn run_sweeper(cache: ArtifactCache, policy: EvictionPolicy, every: std::time::Duration) {
    let mut ticker = tokio::time::interval(every);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match cache.sweep(&policy).await {
            Ok(report) => tracing::debug!(
                examined = report.examined,
                evicted = report.evicted(),
                "Artifact sweep finished"
            ),
            Err(e) => tracing::warn!("Artifact sweep failed: {}", e),
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
