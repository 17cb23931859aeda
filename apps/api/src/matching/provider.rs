//! Graph Snapshot Provider — the injected source of domain/edge snapshots.
//!
//! The engine only sees `&dyn GraphSnapshotProvider`. `AppState` carries an
//! `Arc<dyn GraphSnapshotProvider>` chosen at startup from config: the graph store
//! adapter in `graph_client`, or a JSON file for offline runs.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::matching::taxonomy::{DomainNode, GraphSnapshot, RawDomain};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Graph store error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed snapshot payload: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graph store did not answer in time")]
    Timeout,
}

/// Supplies, for every domain, its name and complete weighted edge list.
///
/// Each call returns a fresh snapshot. Connection reuse is the implementor's business.
#[async_trait]
pub trait GraphSnapshotProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError>;

    /// Cheap liveness probe. Defaults to a full fetch.
    async fn ping(&self) -> Result<(), SnapshotError> {
        self.fetch_snapshot().await.map(|_| ())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryProvider
// ────────────────────────────────────────────────────────────────────────────

/// Serves a fixed snapshot. Each fetch hands out an independent clone.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    snapshot: GraphSnapshot,
}

#[allow(dead_code)]
impl InMemoryProvider {
    pub fn new(snapshot: GraphSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl GraphSnapshotProvider for InMemoryProvider {
    async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
        Ok(self.snapshot.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JsonFileProvider
// ────────────────────────────────────────────────────────────────────────────

/// Reads `[{ "name": .., "skills": [{skill, weight, category}] }]` from disk on every fetch,
/// so edits to the file show up on the next request.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl GraphSnapshotProvider for JsonFileProvider {
    async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let raw: Vec<RawDomain> = serde_json::from_slice(&bytes)?;
        Ok(GraphSnapshot::new(
            raw.into_iter().map(DomainNode::from).collect(),
        ))
    }

    async fn ping(&self) -> Result<(), SnapshotError> {
        tokio::fs::metadata(&self.path).await?;
        Ok(())
    }
}
