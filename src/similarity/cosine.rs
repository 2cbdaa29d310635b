//! Cosine similarity for dense vectors.

use crate::similarity::SimilarityMeasure;
use ndarray::ArrayView1;

/// Cosine similarity measure.
///
/// dot(a, b) / (|a| * |b|); zero-norm inputs compare as orthogonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityMeasure for CosineSimilarity {
    fn similarity(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        cosine_similarity(a, b)
    }

    fn distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        cosine_distance(a, b)
    }
}

/// Cosine similarity of two rows. Returns 0.0 for zero vectors or NaN results.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let dot = a.dot(&b);
    let norm = (a.dot(&a) * b.dot(&b)).sqrt();
    if norm == 0.0 {
        return 0.0;
    }
    let sim = dot / norm;
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}

/// Cosine distance `1 - cos(a, b)`.
///
/// Degenerate inputs (a zero vector on either side, or any non-finite
/// intermediate) yield 0.0 so the deviation signal never carries NaN.
pub fn cosine_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let norm = (a.dot(&a) * b.dot(&b)).sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return 0.0;
    }
    let dist = 1.0 - a.dot(&b) / norm;
    if dist.is_finite() {
        dist.max(0.0)
    } else {
        0.0
    }
}
