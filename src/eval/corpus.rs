//! End-to-end evaluation of a document collection.
//!
//! Documents are segmented and scored independently on the rayon pool. Each
//! worker fills its own forked accumulators, which are merged once all
//! documents are done.

use crate::config::{ClassificationUnit, Config, WindowPolicy};
use crate::error::{Result, TopicSegError};
use crate::eval::{
    ClassificationEvaluator, DocumentScores, EvaluationReport, SegmentationEvaluator,
};
use crate::segmentation::labeling::segment_scores;
use crate::segmentation::{label_segments, DocumentEmbeddings, EmbeddingSegmenter, Segment};
use log::info;
use ndarray::Array2;
use rayon::prelude::*;
use std::time::Instant;

/// One document to evaluate.
#[derive(Debug, Clone)]
pub struct EvaluationDocument {
    /// Document identifier, echoed in the outcome.
    pub id: String,
    /// Sentence embeddings.
    pub embeddings: DocumentEmbeddings,
    /// Gold segmentation.
    pub gold: Vec<Segment>,
    /// Predicted class scores, one row per sentence.
    pub class_scores: Option<Array2<f64>>,
}

impl EvaluationDocument {
    /// Number of sentences.
    #[inline]
    pub fn sentence_count(&self) -> usize {
        self.embeddings.sentence_count()
    }
}

/// Per-document result.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// Document identifier.
    pub id: String,
    /// Predicted segments, labeled when class scores were supplied.
    pub segments: Vec<Segment>,
    /// Boundary scores; `None` for empty documents.
    pub scores: Option<DocumentScores>,
}

/// Corpus report plus the per-document outcomes, in input order.
#[derive(Debug, Clone)]
pub struct CorpusEvaluation {
    /// Aggregated metrics.
    pub report: EvaluationReport,
    /// Per-document outcomes.
    pub documents: Vec<DocumentOutcome>,
}

/// Worker-local result of one document.
struct Partial {
    outcome: DocumentOutcome,
    segmentation: SegmentationEvaluator,
    classification: Option<ClassificationEvaluator>,
}

/// Segments and scores whole corpora.
#[derive(Debug, Clone)]
pub struct CorpusEvaluator {
    config: Config,
    labels: Vec<String>,
    segmenter: EmbeddingSegmenter,
}

impl CorpusEvaluator {
    /// Creates an evaluator. `labels` names the classes of the score
    /// matrices; leave it empty to skip classification metrics.
    pub fn new(config: Config, labels: Vec<String>) -> Result<Self> {
        config.validate()?;
        let segmenter = EmbeddingSegmenter::with_config(config.segmenter.clone())?;
        Ok(Self {
            config,
            labels,
            segmenter,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates every document.
    pub fn evaluate(&self, documents: &[EvaluationDocument]) -> Result<CorpusEvaluation> {
        self.evaluate_with_progress(documents, || {})
    }

    /// Evaluates every document, calling `on_document` as each one finishes.
    pub fn evaluate_with_progress<F>(
        &self,
        documents: &[EvaluationDocument],
        on_document: F,
    ) -> Result<CorpusEvaluation>
    where
        F: Fn() + Sync,
    {
        let start = Instant::now();

        let mut segmentation = SegmentationEvaluator::new(&self.config.evaluation);
        if self.config.evaluation.window == WindowPolicy::CorpusFixed {
            let k = segmentation.calibrate(
                documents
                    .iter()
                    .map(|d| (d.gold.as_slice(), d.sentence_count())),
            )?;
            info!("corpus window size k={}", k);
        }

        let mut classification = if self.labels.is_empty() {
            None
        } else {
            Some(
                ClassificationEvaluator::new(self.labels.len(), &self.config.evaluation)?
                    .with_labels(self.labels.clone())?,
            )
        };

        let partials: Vec<Partial> = documents
            .par_iter()
            .map(|doc| {
                let partial =
                    self.evaluate_document(doc, &segmentation, classification.as_ref());
                on_document();
                partial
            })
            .collect::<Result<Vec<_>>>()?;

        let mut outcomes = Vec::with_capacity(partials.len());
        let mut classified = false;
        for partial in partials {
            segmentation.merge(&partial.segmentation);
            if let (Some(total), Some(part)) =
                (classification.as_mut(), partial.classification.as_ref())
            {
                total.merge(part)?;
                classified = true;
            }
            outcomes.push(partial.outcome);
        }

        let report = EvaluationReport {
            segmentation: segmentation.finalize(),
            classification: classification
                .filter(|_| classified)
                .map(|c| c.finalize()),
        };

        info!(
            "evaluated {} documents ({} sentences) in {:?}",
            report.segmentation.documents,
            report.segmentation.sentences,
            start.elapsed()
        );

        Ok(CorpusEvaluation {
            report,
            documents: outcomes,
        })
    }

    fn evaluate_document(
        &self,
        doc: &EvaluationDocument,
        segmentation: &SegmentationEvaluator,
        classification: Option<&ClassificationEvaluator>,
    ) -> Result<Partial> {
        let t = doc.sentence_count();
        let result = self.segmenter.segment(&doc.embeddings, Some(doc.gold.len()))?;
        let mut segments = result.segments;

        let mut cls_eval = None;
        if let (Some(base), Some(class_scores)) = (classification, doc.class_scores.as_ref()) {
            if class_scores.nrows() != t {
                return Err(TopicSegError::mismatch(t, class_scores.nrows()));
            }
            // Labels must be in place before the position arrays are built.
            label_segments(&mut segments, class_scores, &self.labels)?;

            let mut eval = base.fork();
            self.add_examples(&mut eval, doc, class_scores)?;
            cls_eval = Some(eval);
        }

        let mut seg_eval = segmentation.fork();
        let scores = seg_eval.add_document(&doc.gold, &segments, t)?;

        Ok(Partial {
            outcome: DocumentOutcome {
                id: doc.id.clone(),
                segments,
                scores,
            },
            segmentation: seg_eval,
            classification: cls_eval,
        })
    }

    fn add_examples(
        &self,
        eval: &mut ClassificationEvaluator,
        doc: &EvaluationDocument,
        class_scores: &Array2<f64>,
    ) -> Result<()> {
        match self.config.evaluation.unit {
            ClassificationUnit::Sentence => {
                for segment in &doc.gold {
                    let gold = self.one_hot(segment, &doc.id)?;
                    for t in segment.begin..segment.end {
                        eval.add_example(&gold, &class_scores.row(t).to_vec())?;
                    }
                }
            }
            ClassificationUnit::Segment => {
                let means = segment_scores(&doc.gold, class_scores)?;
                for (segment, row) in doc.gold.iter().zip(means.outer_iter()) {
                    let gold = self.one_hot(segment, &doc.id)?;
                    eval.add_example(&gold, &row.to_vec())?;
                }
            }
        }
        Ok(())
    }

    fn one_hot(&self, segment: &Segment, document: &str) -> Result<Vec<f64>> {
        let label = segment.label.as_deref().ok_or_else(|| {
            TopicSegError::InvalidParameter(format!(
                "gold segment [{}, {}) of document {} has no label",
                segment.begin, segment.end, document
            ))
        })?;
        let class = self.labels.iter().position(|l| l == label).ok_or_else(|| {
            TopicSegError::InvalidParameter(format!(
                "gold label {:?} of document {} is not a known class",
                label, document
            ))
        })?;
        let mut gold = vec![0.0; self.labels.len()];
        gold[class] = 1.0;
        Ok(gold)
    }
}
