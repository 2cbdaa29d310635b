//! # topicseg - Embedding-based Topic Segmentation
//!
//! topicseg splits documents into topically coherent segments from their
//! per-sentence embeddings and scores the result against gold annotations.
//!
//! ## Overview
//!
//! Each document arrives as a `T x D` matrix of sentence embeddings. The
//! segmenter projects it onto its leading principal components, smooths the
//! trajectory with a Gaussian kernel along time and measures how far each
//! sentence drifts from its neighbour. Peaks of that deviation series become
//! segment boundaries.
//!
//! ## Key Features
//!
//! - **PCA reduction** with centred or uncentred second moments
//! - **Unidirectional and bidirectional** deviation signals
//! - **Constrained edge detection** for a fixed or oracle segment count
//! - **Pk and WindowDiff** with corpus, per-document or fixed windows
//! - **Ranking metrics**: MAP, MRR, P@K, R@K, accuracy, micro/macro F1
//! - **Parallel corpus evaluation** with mergeable accumulators
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use topicseg::{DocumentEmbeddings, EmbeddingSegmenter};
//!
//! let segmenter = EmbeddingSegmenter::new()?;
//! let result = segmenter.segment(&DocumentEmbeddings::new(embeddings), None)?;
//! for segment in &result.segments {
//!     println!("[{}, {})", segment.begin, segment.end);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`signal`] - PCA, Gaussian smoothing, deviation and edge detection
//! - [`segmentation`] - segments, position arrays and the segmenter
//! - [`eval`] - boundary, ranking and corpus-level metrics
//! - [`similarity`] - similarity measures over embedding rows
//!
//! ## Evaluating a Corpus
//!
//! ```rust,ignore
//! use topicseg::{Config, CorpusEvaluator};
//!
//! let evaluator = CorpusEvaluator::new(Config::default(), labels)?;
//! let result = evaluator.evaluate(&documents)?;
//! println!("{}", result.report);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod eval;
pub mod segmentation;
pub mod signal;
pub mod similarity;

// Re-export commonly used types
pub use config::{
    AveragePrecisionMode, Centering, ClassificationUnit, Config, DeviationMode,
    EvaluationConfig, MergePolicy, SegmentCount, SegmenterConfig, WindowPolicy,
};
pub use error::{Result, TopicSegError};
pub use eval::{
    evaluate_segments, pk, window_diff, window_size, ClassificationEvaluator,
    ClassificationScores, CorpusEvaluation, CorpusEvaluator, DocumentOutcome,
    EvaluationDocument, EvaluationReport, SegmentationEvaluator, SegmentationScores,
};
pub use segmentation::{
    label_segments, validate_segmentation, DocumentEmbeddings, EmbeddingSegmenter,
    PositionArray, Provenance, Segment, SegmentBuilder, SegmentationResult,
};
pub use signal::{EdgeDetector, EdgeVector, GaussianSmoother, PcaReducer};
pub use similarity::{CosineSimilarity, SimilarityMeasure};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = Config::default();
        assert_eq!(config.segmenter.mode, DeviationMode::Unidirectional);
        assert!((config.segmenter.effective_sigma() - config::DEFAULT_SIGMA_UNIDIRECTIONAL).abs() < 1e-12);
    }
}
