//! Embedding-driven topic segmentation.
//!
//! Per-sentence embeddings are projected onto their leading principal
//! directions, smoothed with a Gaussian kernel along time, turned into a
//! deviation series and cut at the detected edges.

use crate::config::{DeviationMode, SegmentCount, SegmenterConfig};
use crate::error::{Result, TopicSegError};
use crate::segmentation::{Segment, SegmentBuilder};
use crate::signal::{
    deviation, zero_leading_columns, EdgeDetector, EdgeVector, GaussianSmoother, PcaReducer,
};
use log::debug;
use ndarray::Array2;
use rayon::prelude::*;
use std::time::Instant;

/// Sentence embeddings of one document as produced by the encoder.
#[derive(Debug, Clone)]
pub struct DocumentEmbeddings {
    /// Forward (or only) embeddings, one row per sentence.
    pub forward: Array2<f64>,
    /// Backward embeddings, required in bidirectional mode.
    pub backward: Option<Array2<f64>>,
}

impl DocumentEmbeddings {
    /// Wraps single-direction embeddings.
    pub fn new(forward: Array2<f64>) -> Self {
        Self {
            forward,
            backward: None,
        }
    }

    /// Wraps forward and backward embeddings of equal shape.
    pub fn bidirectional(forward: Array2<f64>, backward: Array2<f64>) -> Result<Self> {
        if forward.dim() != backward.dim() {
            return Err(TopicSegError::mismatch(forward.len(), backward.len()));
        }
        Ok(Self {
            forward,
            backward: Some(backward),
        })
    }

    /// Number of sentences.
    #[inline]
    pub fn sentence_count(&self) -> usize {
        self.forward.nrows()
    }
}

/// Result of segmenting one document.
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    /// Predicted segments, partitioning the document.
    pub segments: Vec<Segment>,
    /// Boundary indicators the segments were built from.
    pub edges: EdgeVector,
    /// Deviation series the edges were detected on.
    pub deviation: Vec<f64>,
}

/// Segments documents from their sentence embeddings.
#[derive(Debug, Clone)]
pub struct EmbeddingSegmenter {
    config: SegmenterConfig,
    reducer: PcaReducer,
    smoother: GaussianSmoother,
}

impl EmbeddingSegmenter {
    /// Creates a segmenter with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(SegmenterConfig::default())
    }

    /// Creates a segmenter with custom configuration.
    pub fn with_config(config: SegmenterConfig) -> Result<Self> {
        let reducer = PcaReducer::new(config.pca_components, config.centering)?;
        let smoother = GaussianSmoother::new(config.effective_sigma())?;
        Ok(Self {
            config,
            reducer,
            smoother,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segments one document.
    ///
    /// `gold_segments` is the number of gold segments and is only consulted
    /// with [`SegmentCount::Oracle`].
    pub fn segment(
        &self,
        document: &DocumentEmbeddings,
        gold_segments: Option<usize>,
    ) -> Result<SegmentationResult> {
        let start = Instant::now();
        let t = document.sentence_count();
        let detector = self.detector(gold_segments)?;

        if t < 2 {
            let segments = SegmentBuilder::build(t, None)?;
            return Ok(SegmentationResult {
                segments,
                edges: EdgeVector::new(vec![true; t]),
                deviation: vec![0.0; t],
            });
        }

        let deviation = match self.config.mode {
            DeviationMode::Unidirectional => self.unidirectional(&document.forward)?,
            DeviationMode::Bidirectional => {
                let backward = document.backward.as_ref().ok_or_else(|| {
                    TopicSegError::InvalidParameter(
                        "bidirectional mode needs backward embeddings".to_string(),
                    )
                })?;
                self.bidirectional(&document.forward, backward)?
            }
        };

        let edges = detector.detect(&deviation);
        let segments = SegmentBuilder::build(t, Some(&edges))?;

        debug!(
            "segmented {} sentences into {} segments in {:?}",
            t,
            segments.len(),
            start.elapsed()
        );

        Ok(SegmentationResult {
            segments,
            edges,
            deviation,
        })
    }

    /// Segments many documents in parallel, preserving input order.
    pub fn segment_all(
        &self,
        documents: &[(DocumentEmbeddings, Option<usize>)],
    ) -> Vec<Result<SegmentationResult>> {
        documents
            .par_iter()
            .map(|(document, gold)| self.segment(document, *gold))
            .collect()
    }

    fn detector(&self, gold_segments: Option<usize>) -> Result<EdgeDetector> {
        match self.config.segment_count {
            SegmentCount::Unconstrained => Ok(EdgeDetector::Unconstrained),
            SegmentCount::Fixed(segments) => Ok(EdgeDetector::Constrained { segments }),
            SegmentCount::Oracle => gold_segments
                .map(|segments| EdgeDetector::Constrained { segments })
                .ok_or_else(|| {
                    TopicSegError::InvalidParameter(
                        "oracle segment count requested without gold segments".to_string(),
                    )
                }),
        }
    }

    fn unidirectional(&self, embeddings: &Array2<f64>) -> Result<Vec<f64>> {
        let reduced = self.reducer.reduce(embeddings)?;
        let smoothed = self.smoother.smooth(&reduced);
        debug!(
            "unidirectional deviation over {}x{} (sigma={})",
            smoothed.nrows(),
            smoothed.ncols(),
            self.smoother.sigma()
        );
        Ok(deviation::unidirectional(&smoothed))
    }

    fn bidirectional(&self, forward: &Array2<f64>, backward: &Array2<f64>) -> Result<Vec<f64>> {
        if forward.dim() != backward.dim() {
            return Err(TopicSegError::mismatch(forward.len(), backward.len()));
        }

        let mut fw = self.reducer.reduce(forward)?;
        let mut bw = self.reducer.reduce(backward)?;
        zero_leading_columns(&mut fw, self.config.drift_components);
        zero_leading_columns(&mut bw, self.config.drift_components);

        let fw = self.smoother.smooth(&fw);
        let bw = self.smoother.smooth(&bw);
        debug!(
            "bidirectional deviation over {}x{} (sigma={}, {} drift columns removed)",
            fw.nrows(),
            fw.ncols(),
            self.smoother.sigma(),
            self.config.drift_components
        );
        deviation::bidirectional(&fw, &bw)
    }
}
