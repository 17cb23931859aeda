//! Match Scorer — per-domain match statistics.
//!
//! Algorithm, for one domain:
//! 1. total_weight_all = Σ effective weight over every edge. Domains with total ≤ 0 are dropped.
//! 2. An edge matches when its normalized name is non-empty, is in the input set,
//!    and its effective weight is strictly positive.
//! 3. Domains with no matched edge are dropped.
//! 4. match_percentage = round_half_away(100 × matched / total), clamped to 0 – 100.
//!    A total that overflows f64 is recomputed on weights scaled by the largest edge.

use serde::Serialize;
use tracing::debug;

use crate::matching::normalizer::{normalize_skill_name, NormalizedSkills};
use crate::matching::taxonomy::{DomainNode, SkillCategory};

/// A graph edge that satisfied the match predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSkill {
    /// Graph casing, not the caller's.
    #[serde(rename = "skill")]
    pub skill_name: String,
    pub weight: f64,
    /// Category label as stored in the graph.
    #[serde(rename = "category")]
    pub category_label: String,
}

/// Match statistics for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    #[serde(rename = "job_name")]
    pub domain_name: String,
    pub match_count: usize,
    pub match_percentage: u32, // 0 – 100
    /// Sum of matched edge weights.
    #[serde(rename = "total_weight")]
    pub total_matched_weight: f64,
    pub matched_skills: Vec<MatchedSkill>,
    #[serde(rename = "hard_skills_count")]
    pub hard_skill_count: usize,
    #[serde(rename = "soft_skills_count")]
    pub soft_skill_count: usize,
    /// Denominator of the percentage. Internal only.
    #[serde(skip)]
    #[allow(dead_code)]
    pub total_weight_all: f64,
}

/// Scores one domain. `None` when the domain has no usable weight or nothing matched.
pub fn score_domain(domain: &DomainNode, input: &NormalizedSkills) -> Option<MatchResult> {
    let total_weight_all: f64 = domain.skills.iter().map(|edge| edge.weight).sum();
    if total_weight_all <= 0.0 {
        debug!(domain = %domain.name, "domain has no positive edge weight, skipped");
        return None;
    }

    let mut matched_skills = Vec::new();
    let mut total_matched_weight = 0.0_f64;
    let mut hard_skill_count = 0;
    let mut soft_skill_count = 0;

    for edge in &domain.skills {
        if edge.malformed_weight {
            debug!(domain = %domain.name, skill = %edge.skill_name, "malformed edge weight treated as 0");
        }

        let normalized = normalize_skill_name(&edge.skill_name);
        if normalized.is_empty() {
            continue;
        }
        if !input.contains(&normalized) || edge.weight <= 0.0 {
            continue;
        }

        total_matched_weight += edge.weight;
        match edge.category {
            SkillCategory::Hard => hard_skill_count += 1,
            SkillCategory::Soft => soft_skill_count += 1,
            SkillCategory::Unspecified => {}
        }
        matched_skills.push(MatchedSkill {
            skill_name: edge.skill_name.clone(),
            weight: edge.weight,
            category_label: edge.category_label.clone(),
        });
    }

    if matched_skills.is_empty() {
        return None;
    }

    // Matched edges are a subset of the non-negative addends of the total.
    debug_assert!(total_matched_weight > 0.0 && total_matched_weight <= total_weight_all);

    let match_percentage = if total_weight_all.is_finite() {
        percentage(total_matched_weight, total_weight_all)
    } else {
        scaled_percentage(domain, &matched_skills)
    };

    Some(MatchResult {
        domain_name: domain.name.clone(),
        match_count: matched_skills.len(),
        match_percentage,
        total_matched_weight,
        matched_skills,
        hard_skill_count,
        soft_skill_count,
        total_weight_all,
    })
}

/// `f64::round` rounds half away from zero, which is the policy callers compare against.
/// Multiplying first keeps results identical to `100 * m / t` whenever that is finite.
fn percentage(matched: f64, total: f64) -> u32 {
    let raw = 100.0 * matched / total;
    let raw = if raw.is_finite() {
        raw
    } else {
        (matched / total) * 100.0
    };
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u32
}

/// Percentage for a domain whose total weight overflowed: every weight is divided by the
/// largest one first, so both sums stay within the edge count.
fn scaled_percentage(domain: &DomainNode, matched: &[MatchedSkill]) -> u32 {
    let max_weight = domain
        .skills
        .iter()
        .map(|edge| edge.weight)
        .fold(0.0_f64, f64::max);
    let total: f64 = domain.skills.iter().map(|edge| edge.weight / max_weight).sum();
    let matched: f64 = matched.iter().map(|m| m.weight / max_weight).sum();
    percentage(matched, total)
}
