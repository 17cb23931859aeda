pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/graph/health", get(handlers::handle_graph_health))
        // Legacy path kept for existing clients
        .route("/api/query-skills-to-jobs", post(handlers::handle_match))
        .with_state(state)
}
