//! Matching engine — normalizes input, fetches one snapshot, scores, ranks, assembles.
//!
//! The provider fetch is the only await point. Dropping the returned future while it
//! is pending abandons the fetch and no scoring happens. Scoring itself is synchronous
//! and linear in the number of edges.

use serde::Serialize;
use tracing::{debug, warn};

use crate::matching::normalizer::NormalizedSkills;
use crate::matching::provider::GraphSnapshotProvider;
use crate::matching::ranker::rank_results;
use crate::matching::scorer::{score_domain, MatchResult};
use crate::matching::taxonomy::GraphSnapshot;

/// Output contract of a matching call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResponse {
    #[serde(rename = "jobs")]
    pub results: Vec<MatchResult>,
    /// Size of the deduplicated normalized input set.
    pub input_skills_count: usize,
    /// The caller's skills exactly as given. Existing clients read the raw list under
    /// this name, so it is not the normalized set.
    pub normalized_input_skills: Vec<String>,
}

/// Why a response looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one domain matched.
    Matched,
    /// Snapshot fetched, no domain overlapped the input.
    NoOverlap,
    /// Input normalized to nothing. The provider was not contacted.
    EmptyInput,
    /// Provider failed. The response is empty for that reason, not for lack of overlap.
    SnapshotUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub response: MatchResponse,
    pub status: MatchStatus,
}

impl MatchOutcome {
    fn empty_input() -> Self {
        Self {
            response: MatchResponse::default(),
            status: MatchStatus::EmptyInput,
        }
    }
}

/// Matches raw skills against every domain the provider knows about.
pub async fn match_skills_to_jobs(
    provider: &dyn GraphSnapshotProvider,
    skills: &[String],
) -> MatchOutcome {
    let input = NormalizedSkills::from_raw(skills);
    if input.is_empty() {
        return MatchOutcome::empty_input();
    }

    match provider.fetch_snapshot().await {
        Ok(snapshot) => assemble(&snapshot, &input, skills),
        Err(e) => {
            warn!("Graph snapshot unavailable, returning degraded empty result: {e}");
            MatchOutcome {
                response: MatchResponse::default(),
                status: MatchStatus::SnapshotUnavailable,
            }
        }
    }
}

/// Same as `match_skills_to_jobs` for a snapshot already in hand. No I/O.
#[allow(dead_code)]
pub fn match_snapshot(snapshot: &GraphSnapshot, skills: &[String]) -> MatchOutcome {
    let input = NormalizedSkills::from_raw(skills);
    if input.is_empty() {
        return MatchOutcome::empty_input();
    }
    assemble(snapshot, &input, skills)
}

fn assemble(snapshot: &GraphSnapshot, input: &NormalizedSkills, raw: &[String]) -> MatchOutcome {
    let mut results: Vec<MatchResult> = snapshot
        .domains
        .iter()
        .filter_map(|domain| score_domain(domain, input))
        .collect();
    rank_results(&mut results);

    debug!(
        domains = snapshot.domains.len(),
        edges = snapshot.edge_count(),
        matched = results.len(),
        input_skills = input.len(),
        "skill match computed"
    );

    let status = if results.is_empty() {
        MatchStatus::NoOverlap
    } else {
        MatchStatus::Matched
    };

    MatchOutcome {
        response: MatchResponse {
            results,
            input_skills_count: input.len(),
            normalized_input_skills: raw.to_vec(),
        },
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::provider::{InMemoryProvider, SnapshotError};
    use crate::matching::taxonomy::{DomainNode, SkillEdge};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn domain(name: &str, edges: &[(&str, f64, &str)]) -> DomainNode {
        DomainNode {
            name: name.to_string(),
            skills: edges
                .iter()
                .map(|(skill, weight, category)| SkillEdge::new(*skill, *weight, *category))
                .collect(),
        }
    }

    fn skills(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> GraphSnapshot {
        GraphSnapshot::new(vec![
            domain("D1", &[("Python", 0.6, "硬实力"), ("SQL", 0.4, "硬实力")]),
            domain("D2", &[("Python", 0.0, "硬实力"), ("SQL", -1.0, "硬实力")]),
            domain("D3", &[("Java", 0.5, "硬实力"), ("Go", 0.5, "硬实力")]),
            domain("D4", &[("Rust", 2.0, "硬实力"), ("C", 2.0, "硬实力")]),
            domain("D5", &[("Rust", 1.0, "硬实力"), ("Teamwork", 1.0, "软实力")]),
        ])
    }

    /// Counts fetches so tests can prove the provider was never contacted.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GraphSnapshotProvider for CountingProvider {
        async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(fixture())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl GraphSnapshotProvider for FailingProvider {
        async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
            Err(SnapshotError::Timeout)
        }
    }

    /// Never resolves; stands in for a hung graph store.
    struct PendingProvider;

    #[async_trait]
    impl GraphSnapshotProvider for PendingProvider {
        async fn fetch_snapshot(&self) -> Result<GraphSnapshot, SnapshotError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_single_domain_scenario() {
        let provider = InMemoryProvider::new(fixture());
        let outcome = match_skills_to_jobs(&provider, &skills(&["python"])).await;

        assert_eq!(outcome.status, MatchStatus::Matched);
        let results = &outcome.response.results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].domain_name, "D1");
        assert_eq!(results[0].match_percentage, 60);
        assert_eq!(results[0].hard_skill_count, 1);
        assert_eq!(outcome.response.input_skills_count, 1);
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let provider = CountingProvider::default();
        let outcome = match_skills_to_jobs(&provider, &[]).await;
        assert_eq!(outcome.status, MatchStatus::EmptyInput);
        assert_eq!(outcome.response, MatchResponse::default());

        let outcome = match_skills_to_jobs(&provider, &skills(&["  ", ""])).await;
        assert_eq!(outcome.status, MatchStatus::EmptyInput);
        assert!(outcome.response.normalized_input_skills.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_overlap_is_distinct_from_unavailable() {
        let provider = InMemoryProvider::new(fixture());
        let outcome = match_skills_to_jobs(&provider, &skills(&["Haskell"])).await;
        assert_eq!(outcome.status, MatchStatus::NoOverlap);
        assert!(outcome.response.results.is_empty());

        let outcome = match_skills_to_jobs(&FailingProvider, &skills(&["Haskell"])).await;
        assert_eq!(outcome.status, MatchStatus::SnapshotUnavailable);
        assert_eq!(outcome.response, MatchResponse::default());
    }

    #[tokio::test]
    async fn test_tie_on_percentage_breaks_on_weight() {
        let provider = InMemoryProvider::new(fixture());
        let outcome = match_skills_to_jobs(&provider, &skills(&["rust"])).await;
        let names: Vec<&str> = outcome
            .response
            .results
            .iter()
            .map(|r| r.domain_name.as_str())
            .collect();
        assert_eq!(names, vec!["D4", "D5"]);
        assert_eq!(outcome.response.results[0].match_percentage, 50);
        assert_eq!(outcome.response.results[1].match_percentage, 50);
    }

    #[tokio::test]
    async fn test_raw_input_echoed_and_count_deduplicated() {
        let provider = InMemoryProvider::new(fixture());
        let raw = skills(&[" Python ", "python", "SQL", ""]);
        let outcome = match_skills_to_jobs(&provider, &raw).await;
        assert_eq!(outcome.response.normalized_input_skills, raw);
        assert_eq!(outcome.response.input_skills_count, 2);
        assert_eq!(outcome.response.results[0].match_percentage, 100);
    }

    #[tokio::test]
    async fn test_cancel_while_fetching_returns_promptly() {
        let input = skills(&["rust"]);
        let call = match_skills_to_jobs(&PendingProvider, &input);
        let result = tokio::time::timeout(std::time::Duration::from_millis(20), call).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_match_snapshot_response_json_shape() {
        let outcome = match_snapshot(&fixture(), &skills(&["Python", "Teamwork"]));
        let json = serde_json::to_value(&outcome.response).unwrap();
        assert_eq!(json["input_skills_count"], 2);
        assert_eq!(json["normalized_input_skills"][0], "Python");
        assert_eq!(json["jobs"][0]["job_name"], "D1");
        assert_eq!(json["jobs"][1]["job_name"], "D5");
        assert_eq!(json["jobs"][1]["soft_skills_count"], 1);
    }

    #[test]
    fn test_weightless_domain_never_emitted() {
        let outcome = match_snapshot(&fixture(), &skills(&["python", "sql", "rust", "java", "go"]));
        assert!(outcome
            .response
            .results
            .iter()
            .all(|r| r.domain_name != "D2"));
    }

    proptest! {
        #[test]
        fn test_ranking_and_dedup_properties(
            picks in proptest::collection::vec(
                prop_oneof![
                    Just("python"), Just("SQL"), Just("rust"), Just(" Go "),
                    Just("java"), Just("teamwork"), Just("c"), Just("none")
                ],
                0..10,
            )
        ) {
            let raw = skills(&picks);
            let outcome = match_snapshot(&fixture(), &raw);

            for pair in outcome.response.results.windows(2) {
                prop_assert!(pair[0].match_percentage >= pair[1].match_percentage);
                if pair[0].match_percentage == pair[1].match_percentage {
                    prop_assert!(pair[0].total_matched_weight >= pair[1].total_matched_weight);
                }
            }

            let mut doubled = raw.clone();
            doubled.extend(raw.iter().cloned());
            let again = match_snapshot(&fixture(), &doubled);
            prop_assert_eq!(&again.response.results, &outcome.response.results);
            prop_assert_eq!(again.response.input_skills_count, outcome.response.input_skills_count);
        }
    }
}
