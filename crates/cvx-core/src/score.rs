//! Relevance scoring for search results.
//!
//! | Rule | Points |
//! |------|--------|
//! | each selected tag found in the record | +10 |
//! | query is a case-insensitive substring of the name | +20 |
//! | every selected tag found (non-empty selection) | +30 |

use std::collections::BTreeSet;

pub const MATCH_POINTS: u32 = 10;
pub const NAME_POINTS: u32 = 20;
pub const FULL_COVERAGE_POINTS: u32 = 30;

/// Score one record. Rules are additive and independent.
pub fn relevance_score(
    extracted: &BTreeSet<String>,
    selected: &BTreeSet<String>,
    query: &str,
    display_name: &str,
) -> u32 {
    let matched = extracted.intersection(selected).count() as u32;
    let mut score = matched * MATCH_POINTS;

    if !query.is_empty() && display_name.to_lowercase().contains(&query.to_lowercase()) {
        score += NAME_POINTS;
    }

    if !selected.is_empty() && matched as usize == selected.len() {
        score += FULL_COVERAGE_POINTS;
    }

    score
}

/// Stars out of five shown next to a score: one per 20 points.
pub fn relevance_stars(score: u32) -> u32 {
    (score / 20).min(5)
}
