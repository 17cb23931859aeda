mod config;
mod errors;
mod graph_client;
mod matching;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, GraphSource};
use crate::graph_client::GraphClient;
use crate::matching::provider::{GraphSnapshotProvider, JsonFileProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    let provider = build_provider(&config)?;

    let state = AppState {
        config: config.clone(),
        provider,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the snapshot source from config.
fn build_provider(config: &Config) -> Result<Arc<dyn GraphSnapshotProvider>> {
    match &config.graph {
        GraphSource::File(path) => {
            info!("Serving taxonomy snapshots from {}", path.display());
            Ok(Arc::new(JsonFileProvider::new(path.clone())))
        }
        GraphSource::Store(settings) => {
            let client = GraphClient::new(settings.clone())
                .context("Failed to build graph store HTTP client")?;
            info!(
                "Graph store client initialized ({}, db {}, timeout {:?})",
                settings.base_url, settings.database, settings.timeout
            );
            Ok(Arc::new(client))
        }
    }
}
