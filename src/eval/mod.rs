//! Evaluation of predicted segmentations and class predictions.
//!
//! - [`boundary`] - Pk and WindowDiff over position arrays
//! - [`ranking`] - MAP, MRR, P@K, R@K, accuracy and micro/macro P/R/F1
//! - [`corpus`] - parallel end-to-end evaluation of a document collection

pub mod boundary;
pub mod corpus;
pub mod ranking;
mod report;

pub use boundary::{pk, window_diff, window_size, DocumentScores, SegmentationEvaluator, SegmentationScores};
pub use corpus::{CorpusEvaluation, CorpusEvaluator, DocumentOutcome, EvaluationDocument};
pub use ranking::{evaluate_segments, rank_descending, ClassCounts, ClassScores, ClassificationEvaluator, ClassificationScores};
pub use report::EvaluationReport;

/// `numerator / denominator`, or 0.0 when the denominator is zero.
#[inline]
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Harmonic mean of precision and recall, 0.0 when both are zero.
#[inline]
pub(crate) fn f1(precision: f64, recall: f64) -> f64 {
    ratio(2.0 * precision * recall, precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn test_f1() {
        assert_eq!(f1(0.0, 0.0), 0.0);
        assert!((f1(1.0, 0.5) - 2.0 / 3.0).abs() < 1e-12);
    }
}
