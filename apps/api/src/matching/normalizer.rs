//! Skill Normalizer — canonical form of a raw skill string for set-membership checks.
//!
//! Canonical form = surrounding whitespace trimmed, then lowercased with the
//! standard Unicode lowercase mapping. No synonym merging, no accent folding,
//! no full case-folding (e.g. `ß` stays `ß`). Non-Latin scripts without case
//! distinctions pass through unchanged.

use std::collections::HashSet;

/// Canonicalizes a raw skill name. Total: never fails, may return an empty string.
pub fn normalize_skill_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.to_lowercase()
}

/// The deduplicated, normalized set of a caller's skills.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSkills {
    set: HashSet<String>,
}

impl NormalizedSkills {
    /// Normalizes every raw skill and drops empties. Duplicates collapse into one entry.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let set = raw
            .iter()
            .map(|s| normalize_skill_name(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { set }
    }

    /// Membership test against an already-normalized name.
    pub fn contains(&self, normalized: &str) -> bool {
        self.set.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize_skill_name("  Python \t"), "python");
        assert_eq!(normalize_skill_name("SQL"), "sql");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(normalize_skill_name(""), "");
        assert_eq!(normalize_skill_name("   \n\t "), "");
    }

    #[test]
    fn test_no_synonym_or_punctuation_rewrites() {
        assert_eq!(normalize_skill_name("Node.js"), "node.js");
        assert_eq!(normalize_skill_name("C++"), "c++");
        assert_ne!(normalize_skill_name("JS"), normalize_skill_name("JavaScript"));
    }

    #[test]
    fn test_cjk_passes_through() {
        assert_eq!(normalize_skill_name(" 沟通能力 "), "沟通能力");
    }

    #[test]
    fn test_set_deduplicates_after_normalization() {
        let skills = NormalizedSkills::from_raw(&["Python", " python ", "PYTHON", "Go", "", "  "]);
        assert_eq!(skills.len(), 2);
        assert!(skills.contains("python"));
        assert!(skills.contains("go"));
        assert!(!skills.contains("Python"));
    }

    #[test]
    fn test_all_blank_input_yields_empty_set() {
        let skills = NormalizedSkills::from_raw(&["", " ", "\t"]);
        assert!(skills.is_empty());
    }

    proptest! {
        #[test]
        fn test_normalization_is_idempotent(raw in ".*") {
            let once = normalize_skill_name(&raw);
            prop_assert_eq!(normalize_skill_name(&once), once.clone());
        }

        #[test]
        fn test_normalized_output_has_no_outer_whitespace(raw in "\\s*[a-zA-Z ]*\\s*") {
            let out = normalize_skill_name(&raw);
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
