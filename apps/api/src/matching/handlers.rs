//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::matching::engine::{match_skills_to_jobs, MatchResponse, MatchStatus};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    /// A list of skill strings, or one comma-separated string. Anything else counts as no skills.
    #[serde(default)]
    pub skills: Value,
}

#[derive(Debug, Serialize)]
pub struct MatchHttpResponse {
    pub success: bool,
    #[serde(flatten)]
    pub response: MatchResponse,
    pub status: MatchStatus,
    pub message: String,
}

impl MatchRequest {
    /// Non-string list members are dropped; a string is split on commas.
    pub fn skill_list(&self) -> Vec<String> {
        match &self.skills {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            _ => vec![],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match (also POST /api/query-skills-to-jobs)
///
/// Ranks every job domain against the submitted skills.
/// A failed graph fetch is a 503, never an empty 200.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchHttpResponse>, AppError> {
    let skills = request.skill_list();
    let outcome = match_skills_to_jobs(state.provider.as_ref(), &skills).await;

    if outcome.status == MatchStatus::SnapshotUnavailable {
        return Err(AppError::GraphUnavailable(
            "snapshot fetch failed during matching".to_string(),
        ));
    }

    let message = match outcome.response.results.len() {
        0 => "no matching jobs found".to_string(),
        n => format!("found {n} matching jobs"),
    };

    Ok(Json(MatchHttpResponse {
        success: true,
        response: outcome.response,
        status: outcome.status,
        message,
    }))
}

/// GET /api/v1/graph/health
pub async fn handle_graph_health(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    state.provider.ping().await?;
    Ok(Json(json!({ "status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(skills: Value) -> MatchRequest {
        MatchRequest { skills }
    }

    #[test]
    fn test_list_keeps_strings_only() {
        let req = request(json!(["Rust", 3, null, " Go "]));
        assert_eq!(req.skill_list(), vec!["Rust".to_string(), " Go ".to_string()]);
    }

    #[test]
    fn test_comma_string_is_split() {
        let req = request(json!("Rust, Go ,, SQL"));
        assert_eq!(req.skill_list(), vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn test_other_shapes_are_empty() {
        assert!(request(json!({"a": 1})).skill_list().is_empty());
        assert!(request(json!(7)).skill_list().is_empty());
        assert!(MatchRequest::default().skill_list().is_empty());
    }
}
