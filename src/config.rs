//! Configuration for the segmentation pipeline and the evaluation suite.

use crate::error::{Result, TopicSegError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Gaussian bandwidth for unidirectional deviation.
pub const DEFAULT_SIGMA_UNIDIRECTIONAL: f64 = 2.5;

/// Default Gaussian bandwidth for bidirectional deviation.
pub const DEFAULT_SIGMA_BIDIRECTIONAL: f64 = 1.5;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Boundary detection configuration.
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    /// Metric configuration.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TopicSegError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        self.segmenter.validate()?;
        self.evaluation.validate()
    }
}

/// How the deviation signal is derived from the embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMode {
    /// Cosine distance between consecutive rows of one matrix.
    #[default]
    Unidirectional,
    /// Geometric mean of forward-looking and backward-looking distances.
    Bidirectional,
}

/// Whether the reducer subtracts the column means before projecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Centering {
    /// Mean-centre the data (classical PCA).
    #[default]
    Centered,
    /// Use the raw second-moment matrix.
    Uncentered,
}

/// How many boundaries the edge detector should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentCount {
    /// Every strict local maximum becomes a boundary.
    #[default]
    Unconstrained,
    /// Produce exactly this many segments where the signal allows it.
    Fixed(usize),
    /// Use the number of gold segments supplied with the document.
    Oracle,
}

/// Boundary detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Deviation signal variant.
    /// Default: unidirectional.
    pub mode: DeviationMode,

    /// Number of principal components kept before smoothing.
    /// Default: 16.
    pub pca_components: usize,

    /// Centering mode of the reducer.
    /// Default: centered.
    pub centering: Centering,

    /// Gaussian bandwidth. `None` picks the default of the deviation mode.
    pub sigma: Option<f64>,

    /// Leading principal columns zeroed in bidirectional mode.
    /// Default: 2.
    pub drift_components: usize,

    /// Target boundary count policy.
    /// Default: unconstrained.
    pub segment_count: SegmentCount,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            mode: DeviationMode::Unidirectional,
            pca_components: 16,
            centering: Centering::Centered,
            sigma: None,
            drift_components: 2,
            segment_count: SegmentCount::Unconstrained,
        }
    }
}

impl SegmenterConfig {
    /// Returns the smoothing bandwidth in effect for the configured mode.
    pub fn effective_sigma(&self) -> f64 {
        self.sigma.unwrap_or(match self.mode {
            DeviationMode::Unidirectional => DEFAULT_SIGMA_UNIDIRECTIONAL,
            DeviationMode::Bidirectional => DEFAULT_SIGMA_BIDIRECTIONAL,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.pca_components == 0 {
            return Err(TopicSegError::Config(
                "pca_components must be at least 1".to_string(),
            ));
        }
        let sigma = self.effective_sigma();
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(TopicSegError::Config(format!(
                "sigma must be positive, got {}",
                sigma
            )));
        }
        Ok(())
    }
}

/// Window size policy for Pk and WindowDiff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// One k from the mean gold segment length of the whole corpus.
    #[default]
    CorpusFixed,
    /// A fresh k from each document's own gold segments.
    PerDocument,
    /// A caller-chosen k.
    Fixed(usize),
}

/// How segment ids are assigned when building position arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Every segment gets its own id.
    #[default]
    KeepAll,
    /// Adjacent segments carrying the same label share an id.
    MergeSameLabel,
}

/// Average precision semantics for gold vectors with several positives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragePrecisionMode {
    /// Only the first positive of the gold vector counts as relevant.
    #[default]
    PrimaryPositive,
    /// Standard multi-label AP over all positives.
    MultiLabel,
}

/// Granularity at which class predictions are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationUnit {
    /// One example per sentence.
    #[default]
    Sentence,
    /// One example per gold segment, scored with the mean sentence scores.
    Segment,
}

/// Metric configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Window size policy for Pk and WindowDiff.
    pub window: WindowPolicy,

    /// Segment id assignment policy.
    pub merge: MergePolicy,

    /// Cut-off for Precision@K, Recall@K and Accuracy@K.
    /// Default: 3.
    pub top_k: usize,

    /// Average precision semantics.
    pub average_precision: AveragePrecisionMode,

    /// Classification granularity.
    /// Default: sentence.
    pub unit: ClassificationUnit,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            window: WindowPolicy::CorpusFixed,
            merge: MergePolicy::KeepAll,
            top_k: 3,
            average_precision: AveragePrecisionMode::PrimaryPositive,
            unit: ClassificationUnit::Sentence,
        }
    }
}

impl EvaluationConfig {
    fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(TopicSegError::Config("top_k must be at least 1".to_string()));
        }
        if let WindowPolicy::Fixed(0) = self.window {
            return Err(TopicSegError::Config(
                "fixed window size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.segmenter.pca_components, 16);
        assert_eq!(config.evaluation.window, WindowPolicy::CorpusFixed);
        assert_eq!(config.evaluation.merge, MergePolicy::KeepAll);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_sigma() {
        let mut config = SegmenterConfig::default();
        assert!((config.effective_sigma() - 2.5).abs() < 1e-12);
        config.mode = DeviationMode::Bidirectional;
        assert!((config.effective_sigma() - 1.5).abs() < 1e-12);
        config.sigma = Some(4.0);
        assert!((config.effective_sigma() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"segmenter": {"mode": "bidirectional", "segment_count": {"fixed": 4}}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.segmenter.mode, DeviationMode::Bidirectional);
        assert_eq!(config.segmenter.segment_count, SegmentCount::Fixed(4));
        assert_eq!(config.segmenter.pca_components, 16);
        assert_eq!(config.evaluation.top_k, 3);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.segmenter.sigma = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.evaluation.window = WindowPolicy::Fixed(0);
        assert!(config.validate().is_err());
    }
}
