use std::cmp::Ordering;

use crate::matching::scorer::MatchResult;

/// Orders results by percentage, then matched weight, both descending.
/// Full ties keep provider order (`sort_by` is stable).
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(compare_relevance);
}

fn compare_relevance(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.match_percentage
        .cmp(&a.match_percentage)
        .then_with(|| b.total_matched_weight.total_cmp(&a.total_matched_weight))
}
