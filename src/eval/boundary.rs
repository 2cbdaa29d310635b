//! Boundary agreement metrics: Pk and WindowDiff.
//!
//! Both slide a window of `k` sentences over the document and count the
//! positions where reference and hypothesis disagree. Pk compares whether
//! the window ends fall in the same segment; WindowDiff compares the number
//! of boundaries inside the window.

use crate::config::{EvaluationConfig, MergePolicy, WindowPolicy};
use crate::error::{Result, TopicSegError};
use crate::eval::ratio;
use crate::segmentation::{PositionArray, Segment};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Window size for a mean gold segment length: `max(round(mean / 2), 2)`.
pub fn window_size(mean_segment_length: f64) -> usize {
    let half = (mean_segment_length / 2.0).round();
    if half.is_finite() && half > 2.0 {
        half as usize
    } else {
        2
    }
}

/// Pk of `hypothesis` against `reference` with window `k`.
pub fn pk(reference: &PositionArray, hypothesis: &PositionArray, k: usize) -> Result<f64> {
    windowed(reference, hypothesis, k, |x, t, k| x[t] == x[t + k])
}

/// WindowDiff of `hypothesis` against `reference` with window `k`.
pub fn window_diff(reference: &PositionArray, hypothesis: &PositionArray, k: usize) -> Result<f64> {
    windowed(reference, hypothesis, k, |x, t, k| {
        (0..k).filter(|&j| x[t + j] != x[t + j + 1]).count()
    })
}

/// Shared sliding-window driver. `probe` summarises one window of one
/// segmentation; a window counts as an error when the two summaries differ.
fn windowed<P, F>(
    reference: &PositionArray,
    hypothesis: &PositionArray,
    k: usize,
    probe: F,
) -> Result<f64>
where
    P: PartialEq,
    F: Fn(&PositionArray, usize, usize) -> P,
{
    if reference.len() != hypothesis.len() {
        return Err(TopicSegError::mismatch(reference.len(), hypothesis.len()));
    }
    if k == 0 {
        return Err(TopicSegError::InvalidParameter(
            "window size must be at least 1".to_string(),
        ));
    }

    let t = reference.len();
    match t {
        0 | 1 => return Ok(0.0),
        2 => {
            let same_ref = reference[0] == reference[1];
            let same_hyp = hypothesis[0] == hypothesis[1];
            return Ok(if same_ref == same_hyp { 0.0 } else { 1.0 });
        }
        _ => {}
    }
    if k >= t {
        return Ok(0.0);
    }

    let windows = t - k;
    let errors = (0..windows)
        .filter(|&i| probe(reference, i, k) != probe(hypothesis, i, k))
        .count();
    Ok(errors as f64 / windows as f64)
}

/// Scores of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentScores {
    /// Pk.
    pub pk: f64,
    /// WindowDiff.
    pub window_diff: f64,
    /// Window size used.
    pub k: usize,
}

/// Corpus-level segmentation scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationScores {
    /// Mean per-document Pk.
    pub pk: f64,
    /// Mean per-document WindowDiff.
    pub window_diff: f64,
    /// Corpus window size, when one was used.
    pub window_size: Option<usize>,
    /// Documents seen.
    pub documents: usize,
    /// Sentences seen.
    pub sentences: usize,
    /// Gold segments.
    pub expected_segments: usize,
    /// Predicted segments.
    pub predicted_segments: usize,
    /// Exact boundary precision.
    pub boundary_precision: f64,
    /// Exact boundary recall.
    pub boundary_recall: f64,
    /// Exact boundary F1.
    pub boundary_f1: f64,
}

/// Accumulates Pk, WindowDiff and corpus counts over many documents.
#[derive(Debug, Clone)]
pub struct SegmentationEvaluator {
    merge: MergePolicy,
    window: WindowPolicy,
    corpus_window: Option<usize>,
    pk_sum: f64,
    window_diff_sum: f64,
    scored: usize,
    documents: usize,
    sentences: usize,
    expected_segments: usize,
    predicted_segments: usize,
    boundary_tp: usize,
    boundary_fp: usize,
    boundary_fn: usize,
}

impl SegmentationEvaluator {
    /// Creates an empty evaluator.
    pub fn new(config: &EvaluationConfig) -> Self {
        Self {
            merge: config.merge,
            window: config.window,
            corpus_window: None,
            pk_sum: 0.0,
            window_diff_sum: 0.0,
            scored: 0,
            documents: 0,
            sentences: 0,
            expected_segments: 0,
            predicted_segments: 0,
            boundary_tp: 0,
            boundary_fp: 0,
            boundary_fn: 0,
        }
    }

    /// Fixes the corpus window size from every gold segmentation of the
    /// corpus. Items are `(gold segments, sentence count)`.
    ///
    /// Required before scoring under [`WindowPolicy::CorpusFixed`].
    pub fn calibrate<'a, I>(&mut self, gold: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a [Segment], usize)>,
    {
        let mut sentences = 0usize;
        let mut segments = 0usize;
        for (segs, count) in gold {
            let positions = PositionArray::from_segments(segs, count, self.merge)?;
            sentences += count;
            segments += positions.segment_count();
        }
        let k = window_size(ratio(sentences as f64, segments as f64));
        self.corpus_window = Some(k);
        Ok(k)
    }

    /// Sets the corpus window size directly.
    pub fn set_corpus_window(&mut self, k: usize) {
        self.corpus_window = Some(k);
    }

    /// Returns an empty evaluator sharing this one's settings and calibration.
    pub fn fork(&self) -> Self {
        let mut fresh = Self::new(&EvaluationConfig {
            merge: self.merge,
            window: self.window,
            ..Default::default()
        });
        fresh.corpus_window = self.corpus_window;
        fresh
    }

    fn window_for(&self, reference: &PositionArray) -> Result<usize> {
        match self.window {
            WindowPolicy::Fixed(k) => Ok(k),
            WindowPolicy::PerDocument => Ok(window_size(ratio(
                reference.len() as f64,
                reference.segment_count() as f64,
            ))),
            WindowPolicy::CorpusFixed => self.corpus_window.ok_or_else(|| {
                TopicSegError::Config(
                    "corpus window size requested before calibration".to_string(),
                )
            }),
        }
    }

    /// Scores one document and adds it to the running totals.
    ///
    /// Returns `None` for an empty document, which is counted but not scored.
    pub fn add_document(
        &mut self,
        gold: &[Segment],
        predicted: &[Segment],
        sentence_count: usize,
    ) -> Result<Option<DocumentScores>> {
        let reference = PositionArray::from_segments(gold, sentence_count, self.merge)?;
        let hypothesis = PositionArray::from_segments(predicted, sentence_count, self.merge)?;
        let k = if sentence_count == 0 {
            None
        } else {
            Some(self.window_for(&reference)?)
        };

        self.documents += 1;
        self.sentences += sentence_count;
        self.expected_segments += reference.segment_count();
        self.predicted_segments += hypothesis.segment_count();

        let Some(k) = k else {
            warn!("skipping boundary metrics for an empty document");
            return Ok(None);
        };

        let gold_bounds: BTreeSet<usize> = reference.boundaries().into_iter().collect();
        let pred_bounds: BTreeSet<usize> = hypothesis.boundaries().into_iter().collect();
        let hits = gold_bounds.intersection(&pred_bounds).count();
        self.boundary_tp += hits;
        self.boundary_fp += pred_bounds.len() - hits;
        self.boundary_fn += gold_bounds.len() - hits;

        let scores = DocumentScores {
            pk: pk(&reference, &hypothesis, k)?,
            window_diff: window_diff(&reference, &hypothesis, k)?,
            k,
        };
        self.pk_sum += scores.pk;
        self.window_diff_sum += scores.window_diff;
        self.scored += 1;

        Ok(Some(scores))
    }

    /// Folds another evaluator's totals into this one.
    pub fn merge(&mut self, other: &SegmentationEvaluator) {
        self.pk_sum += other.pk_sum;
        self.window_diff_sum += other.window_diff_sum;
        self.scored += other.scored;
        self.documents += other.documents;
        self.sentences += other.sentences;
        self.expected_segments += other.expected_segments;
        self.predicted_segments += other.predicted_segments;
        self.boundary_tp += other.boundary_tp;
        self.boundary_fp += other.boundary_fp;
        self.boundary_fn += other.boundary_fn;
    }

    /// Computes the corpus scores (mean of per-document scores).
    pub fn finalize(&self) -> SegmentationScores {
        let precision = ratio(
            self.boundary_tp as f64,
            (self.boundary_tp + self.boundary_fp) as f64,
        );
        let recall = ratio(
            self.boundary_tp as f64,
            (self.boundary_tp + self.boundary_fn) as f64,
        );
        SegmentationScores {
            pk: ratio(self.pk_sum, self.scored as f64),
            window_diff: ratio(self.window_diff_sum, self.scored as f64),
            window_size: match self.window {
                WindowPolicy::Fixed(k) => Some(k),
                WindowPolicy::CorpusFixed => self.corpus_window,
                WindowPolicy::PerDocument => None,
            },
            documents: self.documents,
            sentences: self.sentences,
            expected_segments: self.expected_segments,
            predicted_segments: self.predicted_segments,
            boundary_precision: precision,
            boundary_recall: recall,
            boundary_f1: crate::eval::f1(precision, recall),
        }
    }
}
