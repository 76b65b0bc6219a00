//! Answer confidence from retrieval statistics.
//!
//! Confidence is a pure function of what retrieval returned: how much of
//! the top-K budget was filled (coverage) and how many distinct essays
//! contributed (diversity). No randomness: identical retrievals always
//! score identically.

use crate::types::Chunk;
use std::collections::HashSet;

/// Weight of the coverage term (fraction of top-K filled).
const COVERAGE_WEIGHT: f32 = 0.7;
/// Weight of the diversity term (distinct titles per retrieved chunk).
const DIVERSITY_WEIGHT: f32 = 0.3;

/// Score how well-grounded an answer built from `chunks` is, in [0, 100].
///
/// `score([], k) == 0`, and the value depends only on the chunk count and
/// the set of titles, so reordering identical chunks never changes it.
/// Rounded to one decimal place.
pub fn score(chunks: &[Chunk], top_k: usize) -> f32 {
    if chunks.is_empty() || top_k == 0 {
        return 0.0;
    }

    let count = chunks.len() as f32;
    let coverage = (count / top_k as f32).min(1.0);

    let distinct_titles: HashSet<&str> = chunks.iter().map(|c| c.title.as_str()).collect();
    let diversity = distinct_titles.len() as f32 / count;

    let raw = 100.0 * (COVERAGE_WEIGHT * coverage + DIVERSITY_WEIGHT * diversity);
    ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0)
}
