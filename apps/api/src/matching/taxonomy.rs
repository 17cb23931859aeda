//! Taxonomy snapshot types and the ingestion boundary.
//!
//! The graph store hands back loosely typed edge payloads: weights may be numbers,
//! numeric strings or null, names may be missing, category labels are free text.
//! Everything is coerced into `SkillEdge` here so the scorer never branches on payload shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

const HARD_LABEL: &str = "硬实力";
const SOFT_LABEL: &str = "软实力";

/// Fixed skill category set. Labels outside it map to `Unspecified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillCategory {
    Hard,
    Soft,
    #[default]
    Unspecified,
}

impl SkillCategory {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label == HARD_LABEL || label.eq_ignore_ascii_case("hard") {
            SkillCategory::Hard
        } else if label == SOFT_LABEL || label.eq_ignore_ascii_case("soft") {
            SkillCategory::Soft
        } else {
            SkillCategory::Unspecified
        }
    }
}

/// One domain → category → skill edge, after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillEdge {
    /// Skill name with the casing stored in the graph. Empty when the payload had none.
    pub skill_name: String,
    /// Effective weight: finite and non-negative. Malformed weights are stored as 0.0.
    pub weight: f64,
    pub category: SkillCategory,
    /// Category label exactly as stored in the graph, echoed back to clients.
    pub category_label: String,
    /// Set when the payload's weight was unusable and was coerced to 0.0.
    pub malformed_weight: bool,
}

impl SkillEdge {
    /// Builds an edge from well-typed parts. Negative or non-finite weights are coerced to 0.0.
    #[allow(dead_code)]
    pub fn new(skill_name: impl Into<String>, weight: f64, category_label: impl Into<String>) -> Self {
        let category_label = category_label.into();
        let (weight, malformed_weight) = sanitize_weight(Some(weight));
        Self {
            skill_name: skill_name.into(),
            weight,
            category: SkillCategory::from_label(&category_label),
            category_label,
            malformed_weight,
        }
    }
}

/// One job domain and its complete edge list, in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainNode {
    pub name: String,
    pub skills: Vec<SkillEdge>,
}

/// Every domain known to the graph at the moment of the fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub domains: Vec<DomainNode>,
}

impl GraphSnapshot {
    pub fn new(domains: Vec<DomainNode>) -> Self {
        Self { domains }
    }

    pub fn edge_count(&self) -> usize {
        self.domains.iter().map(|d| d.skills.len()).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw payload forms
// ────────────────────────────────────────────────────────────────────────────

/// Edge as it arrives from the store: `{skill, weight, category}` with any JSON types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkillEdge {
    #[serde(default)]
    pub skill: Value,
    #[serde(default)]
    pub weight: Value,
    #[serde(default)]
    pub category: Value,
}

/// Domain as it arrives from the store or a snapshot file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDomain {
    #[serde(alias = "job_name")]
    pub name: String,
    /// Missing and `null` both mean a domain with no edges.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub skills: Vec<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<RawSkillEdge> for SkillEdge {
    fn from(raw: RawSkillEdge) -> Self {
        let skill_name = raw.skill.as_str().map(str::to_owned).unwrap_or_default();
        let category_label = raw.category.as_str().map(str::to_owned).unwrap_or_default();
        let (weight, malformed_weight) = sanitize_weight(weight_from_value(&raw.weight));
        SkillEdge {
            skill_name,
            weight,
            category: SkillCategory::from_label(&category_label),
            category_label,
            malformed_weight,
        }
    }
}

impl From<RawDomain> for DomainNode {
    fn from(raw: RawDomain) -> Self {
        let skills = raw.skills.into_iter().map(edge_from_value).collect();
        DomainNode {
            name: raw.name,
            skills,
        }
    }
}

/// Coerces one JSON edge payload. A non-object payload becomes a nameless zero-weight edge.
pub fn edge_from_value(value: Value) -> SkillEdge {
    match value {
        Value::Object(_) => serde_json::from_value::<RawSkillEdge>(value)
            .unwrap_or_default()
            .into(),
        _ => SkillEdge {
            skill_name: String::new(),
            weight: 0.0,
            category: SkillCategory::Unspecified,
            category_label: String::new(),
            malformed_weight: true,
        },
    }
}

/// `None` means the payload is not a number at all. Null/missing mirrors `coalesce(weight, 0.0)`.
fn weight_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Returns `(effective_weight, malformed)`.
fn sanitize_weight(weight: Option<f64>) -> (f64, bool) {
    match weight {
        Some(w) if w.is_finite() && w >= 0.0 => (w, false),
        _ => (0.0, true),
    }
}
