//! Cosine similarity between embedding vectors

use thiserror::Error;

/// Misuse of the similarity scorer. Fatal to a single comparison only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Degenerate vector: zero magnitude")]
    DegenerateVector,
}

/// Calculate cosine similarity between two vectors
///
/// Returns a score in `[-1.0, 1.0]`. Identical inputs score exactly `1.0`,
/// so an exact repeat of a cached question always clears a threshold of 1.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let norm_a = magnitude(a);
    let norm_b = magnitude(b);

    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return Err(SimilarityError::DegenerateVector);
    }

    if a == b {
        return Ok(1.0);
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();

    let similarity = dot_product / (norm_a * norm_b);

    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// Euclidean norm, accumulated in f64
pub fn magnitude(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt()
}

/// Whether a vector can take part in a similarity comparison
pub fn is_scorable(v: &[f32]) -> bool {
    let norm = magnitude(v);
    norm > 0.0 && norm.is_finite()
}
