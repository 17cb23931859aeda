use std::sync::Arc;

use crate::config::Config;
use crate::matching::provider::GraphSnapshotProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    /// Snapshot source. Graph store adapter by default, JSON file when GRAPH_SNAPSHOT_PATH is set.
    pub provider: Arc<dyn GraphSnapshotProvider>,
}
