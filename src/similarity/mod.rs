//! Similarity measures for comparing dense embedding rows.

mod cosine;

pub use cosine::{cosine_distance, cosine_similarity, CosineSimilarity};

use ndarray::ArrayView1;

/// Trait for similarity measures between dense vectors.
pub trait SimilarityMeasure {
    /// Computes the similarity between two vectors of equal length.
    fn similarity(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64;

    /// Computes the distance between two vectors.
    ///
    /// Default implementation: 1.0 - similarity.
    fn distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        1.0 - self.similarity(a, b)
    }
}
