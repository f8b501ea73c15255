//! Cosine similarity ranking of corpus rows against a query vector.

use tracing::trace;

/// A ranked corpus row: positional index plus similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
    /// Position of the row in the corpus, which maps 1:1 onto the record at
    /// the same position in the corpus store.
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity between two vectors of equal length.
///
/// Mismatched lengths or a zero-magnitude operand yield 0.0, which the
/// ranker then filters out as a non-recommendation.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank corpus rows by cosine similarity to the query vector.
///
/// Returns at most `top_n` hits with strictly positive scores, sorted
/// descending; equal scores are broken by ascending corpus index so that
/// identical inputs always produce identical output. Requests for more
/// hits than rows truncate silently.
pub fn rank(query: &[f32], rows: &[Vec<f32>], top_n: usize) -> Vec<RankedHit> {
    let mut hits: Vec<RankedHit> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| RankedHit {
            index,
            score: cosine_similarity(query, row),
        })
        .filter(|hit| hit.score > 0.0)
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
    hits.truncate(top_n);

    trace!(result_count = hits.len(), top_n, "similarity ranking complete");
    hits
}
