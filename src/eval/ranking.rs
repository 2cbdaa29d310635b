//! Ranking and classification metrics over class-score vectors.
//!
//! Every example pairs a gold indicator vector with a predicted score
//! vector of the same length. Counters accumulate per example; ratios are
//! only taken in [`ClassificationEvaluator::finalize`].

use crate::config::{AveragePrecisionMode, EvaluationConfig};
use crate::error::{Result, TopicSegError};
use crate::eval::{f1, ratio};
use crate::segmentation::{validate_segmentation, Segment};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Class indices ordered by descending score.
///
/// Ties keep ascending index order; NaN scores rank last.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let (x, y) = (scores[a], scores[b]);
        match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        }
    });
    order
}

/// First index holding the largest gold value, if that value is positive.
fn primary_positive(gold: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &y) in gold.iter().enumerate() {
        if y > 0.0 && best.map_or(true, |b| y > gold[b]) {
            best = Some(i);
        }
    }
    best
}

/// Metrics of a single example.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExampleScores {
    /// Reciprocal rank of the primary positive.
    pub reciprocal_rank: f64,
    /// Average precision.
    pub average_precision: f64,
    /// Precision in the top K.
    pub precision_at_k: f64,
    /// Recall in the top K.
    pub recall_at_k: f64,
}

/// True/false positive and false negative counts of one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    /// Predicted this class and it was the gold class.
    pub tp: usize,
    /// Predicted this class but the gold class differed.
    pub fp: usize,
    /// The gold class, but something else was predicted.
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl ClassCounts {
    /// TP / (TP + FP).
    pub fn precision(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fp) as f64)
    }

    /// TP / (TP + FN).
    pub fn recall(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        f1(self.precision(), self.recall())
    }
}

/// Per-class section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    /// Class index.
    pub class: usize,
    /// Class name, when labels were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Raw counts.
    pub counts: ClassCounts,
    /// Precision.
    pub precision: f64,
    /// Recall.
    pub recall: f64,
    /// F1.
    pub f1: f64,
}

/// Corpus-level ranking and classification scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScores {
    /// Examples seen.
    pub examples: usize,
    /// Cut-off used for the @K metrics.
    pub k: usize,
    /// Mean average precision.
    pub map: f64,
    /// Mean reciprocal rank.
    pub mrr: f64,
    /// Mean Precision@1.
    pub precision_at_1: f64,
    /// Mean Precision@K.
    pub precision_at_k: f64,
    /// Mean Recall@1.
    pub recall_at_1: f64,
    /// Mean Recall@K.
    pub recall_at_k: f64,
    /// Fraction of examples whose gold class ranks first.
    pub accuracy_at_1: f64,
    /// Fraction of examples whose gold class ranks in the top K.
    pub accuracy_at_k: f64,
    /// Micro-averaged precision.
    pub micro_precision: f64,
    /// Micro-averaged recall.
    pub micro_recall: f64,
    /// Micro-averaged F1.
    pub micro_f1: f64,
    /// Macro-averaged precision over all classes.
    pub macro_precision: f64,
    /// Macro-averaged recall over all classes.
    pub macro_recall: f64,
    /// Macro-averaged F1 over all classes.
    pub macro_f1: f64,
    /// Per-class breakdown.
    pub per_class: Vec<ClassScores>,
}

/// Accumulates ranking metrics and a confusion summary over many examples.
#[derive(Debug, Clone)]
pub struct ClassificationEvaluator {
    num_classes: usize,
    k: usize,
    mode: AveragePrecisionMode,
    labels: Option<Vec<String>>,
    examples: usize,
    sum_average_precision: f64,
    sum_reciprocal_rank: f64,
    sum_precision_at_1: f64,
    sum_precision_at_k: f64,
    sum_recall_at_1: f64,
    sum_recall_at_k: f64,
    correct_at_1: usize,
    correct_at_k: usize,
    counts: Vec<ClassCounts>,
}

impl ClassificationEvaluator {
    /// Creates an empty evaluator for `num_classes` classes.
    pub fn new(num_classes: usize, config: &EvaluationConfig) -> Result<Self> {
        if num_classes == 0 {
            return Err(TopicSegError::InvalidParameter(
                "classification needs at least one class".to_string(),
            ));
        }
        if config.top_k == 0 {
            return Err(TopicSegError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            num_classes,
            k: config.top_k,
            mode: config.average_precision,
            labels: None,
            examples: 0,
            sum_average_precision: 0.0,
            sum_reciprocal_rank: 0.0,
            sum_precision_at_1: 0.0,
            sum_precision_at_k: 0.0,
            sum_recall_at_1: 0.0,
            sum_recall_at_k: 0.0,
            correct_at_1: 0,
            correct_at_k: 0,
            counts: vec![ClassCounts::default(); num_classes],
        })
    }

    /// Attaches class names used in the per-class report.
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.num_classes {
            return Err(TopicSegError::mismatch(self.num_classes, labels.len()));
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Number of classes.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns an empty evaluator with the same settings.
    pub fn fork(&self) -> Self {
        Self {
            examples: 0,
            sum_average_precision: 0.0,
            sum_reciprocal_rank: 0.0,
            sum_precision_at_1: 0.0,
            sum_precision_at_k: 0.0,
            sum_recall_at_1: 0.0,
            sum_recall_at_k: 0.0,
            correct_at_1: 0,
            correct_at_k: 0,
            counts: vec![ClassCounts::default(); self.num_classes],
            ..self.clone()
        }
    }

    /// Records an example for which no prediction was made.
    ///
    /// Every ranking metric of the example is zero and the primary positive
    /// counts as a false negative; no class receives a false positive.
    pub fn add_miss(&mut self, gold: &[f64]) -> Result<ExampleScores> {
        if gold.len() != self.num_classes {
            return Err(TopicSegError::mismatch(self.num_classes, gold.len()));
        }
        self.examples += 1;
        if let Some(class) = primary_positive(gold) {
            self.counts[class].fn_ += 1;
        }
        Ok(ExampleScores {
            reciprocal_rank: 0.0,
            average_precision: 0.0,
            precision_at_k: 0.0,
            recall_at_k: 0.0,
        })
    }

    /// Scores one example and adds it to the running totals.
    pub fn add_example(&mut self, gold: &[f64], scores: &[f64]) -> Result<ExampleScores> {
        if gold.len() != self.num_classes {
            return Err(TopicSegError::mismatch(self.num_classes, gold.len()));
        }
        if scores.len() != self.num_classes {
            return Err(TopicSegError::mismatch(self.num_classes, scores.len()));
        }

        let ranking = rank_descending(scores);
        let primary = primary_positive(gold);
        let positives = gold.iter().filter(|&&y| y > 0.0).count();

        let hits_within = |k: usize| ranking.iter().take(k).filter(|&&c| gold[c] > 0.0).count();
        let rank_of = |class: usize| ranking.iter().position(|&c| c == class).map(|p| p + 1);

        let reciprocal_rank = primary
            .and_then(rank_of)
            .map(|r| 1.0 / r as f64)
            .unwrap_or(0.0);

        let average_precision = match self.mode {
            AveragePrecisionMode::PrimaryPositive => reciprocal_rank,
            AveragePrecisionMode::MultiLabel => {
                let mut hits = 0usize;
                let mut accumulated = 0.0;
                for (i, &class) in ranking.iter().enumerate() {
                    if gold[class] > 0.0 {
                        hits += 1;
                        accumulated += hits as f64 / (i + 1) as f64;
                    }
                }
                ratio(accumulated, positives as f64)
            }
        };

        let precision_at_1 = hits_within(1) as f64;
        let precision_at_k = hits_within(self.k) as f64 / self.k as f64;
        let recall_at_1 = ratio(hits_within(1) as f64, positives as f64);
        let recall_at_k = ratio(hits_within(self.k) as f64, positives as f64);

        self.examples += 1;
        self.sum_reciprocal_rank += reciprocal_rank;
        self.sum_average_precision += average_precision;
        self.sum_precision_at_1 += precision_at_1;
        self.sum_precision_at_k += precision_at_k;
        self.sum_recall_at_1 += recall_at_1;
        self.sum_recall_at_k += recall_at_k;

        if let Some(rank) = primary.and_then(rank_of) {
            if rank == 1 {
                self.correct_at_1 += 1;
            }
            if rank <= self.k {
                self.correct_at_k += 1;
            }
        }

        let predicted = ranking[0];
        match primary {
            Some(gold_class) if gold_class == predicted => self.counts[predicted].tp += 1,
            Some(gold_class) => {
                self.counts[predicted].fp += 1;
                self.counts[gold_class].fn_ += 1;
            }
            None => self.counts[predicted].fp += 1,
        }

        Ok(ExampleScores {
            reciprocal_rank,
            average_precision,
            precision_at_k,
            recall_at_k,
        })
    }

    /// Folds another evaluator's totals into this one.
    pub fn merge(&mut self, other: &ClassificationEvaluator) -> Result<()> {
        if other.num_classes != self.num_classes {
            return Err(TopicSegError::mismatch(self.num_classes, other.num_classes));
        }
        self.examples += other.examples;
        self.sum_average_precision += other.sum_average_precision;
        self.sum_reciprocal_rank += other.sum_reciprocal_rank;
        self.sum_precision_at_1 += other.sum_precision_at_1;
        self.sum_precision_at_k += other.sum_precision_at_k;
        self.sum_recall_at_1 += other.sum_recall_at_1;
        self.sum_recall_at_k += other.sum_recall_at_k;
        self.correct_at_1 += other.correct_at_1;
        self.correct_at_k += other.correct_at_k;
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            mine.tp += theirs.tp;
            mine.fp += theirs.fp;
            mine.fn_ += theirs.fn_;
        }
        Ok(())
    }

    /// Computes the corpus scores.
    pub fn finalize(&self) -> ClassificationScores {
        let n = self.examples as f64;
        let classes = self.num_classes as f64;

        let per_class: Vec<ClassScores> = self
            .counts
            .iter()
            .enumerate()
            .map(|(class, counts)| ClassScores {
                class,
                label: self.labels.as_ref().map(|l| l[class].clone()),
                counts: *counts,
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1(),
            })
            .collect();

        let tp: usize = self.counts.iter().map(|c| c.tp).sum();
        let fp: usize = self.counts.iter().map(|c| c.fp).sum();
        let fn_: usize = self.counts.iter().map(|c| c.fn_).sum();
        let micro_precision = ratio(tp as f64, (tp + fp) as f64);
        let micro_recall = ratio(tp as f64, (tp + fn_) as f64);

        ClassificationScores {
            examples: self.examples,
            k: self.k,
            map: ratio(self.sum_average_precision, n),
            mrr: ratio(self.sum_reciprocal_rank, n),
            precision_at_1: ratio(self.sum_precision_at_1, n),
            precision_at_k: ratio(self.sum_precision_at_k, n),
            recall_at_1: ratio(self.sum_recall_at_1, n),
            recall_at_k: ratio(self.sum_recall_at_k, n),
            accuracy_at_1: ratio(self.correct_at_1 as f64, n),
            accuracy_at_k: ratio(self.correct_at_k as f64, n),
            micro_precision,
            micro_recall,
            micro_f1: f1(micro_precision, micro_recall),
            macro_precision: per_class.iter().map(|c| c.precision).sum::<f64>() / classes,
            macro_recall: per_class.iter().map(|c| c.recall).sum::<f64>() / classes,
            macro_f1: per_class.iter().map(|c| c.f1).sum::<f64>() / classes,
            per_class,
        }
    }
}

/// Scores predicted segment labels sentence by sentence.
///
/// Each sentence contributes one example: the one-hot vector of its gold
/// segment's label against the one-hot vector of its predicted segment's
/// label. Sentences in unlabeled predicted segments count as misses.
pub fn evaluate_segments(
    gold: &[Segment],
    predicted: &[Segment],
    labels: &[String],
    config: &EvaluationConfig,
) -> Result<ClassificationScores> {
    let sentence_count = gold.last().map_or(0, |s| s.end);
    validate_segmentation(gold, sentence_count)?;
    validate_segmentation(predicted, sentence_count)?;

    let mut eval = ClassificationEvaluator::new(labels.len(), config)?.with_labels(labels.to_vec())?;
    let mut pred = predicted.iter();
    let mut current = pred.next();
    for segment in gold {
        let truth = one_hot(segment.label.as_deref(), labels)?.ok_or_else(|| {
            TopicSegError::InvalidParameter(format!(
                "gold segment [{}, {}) has no label",
                segment.begin, segment.end
            ))
        })?;
        for t in segment.begin..segment.end {
            while let Some(p) = current.filter(|p| !p.contains(t)) {
                debug_assert!(p.end <= t);
                current = pred.next();
            }
            let guess = match current {
                Some(p) => one_hot(p.label.as_deref(), labels)?,
                None => None,
            };
            match guess {
                Some(scores) => eval.add_example(&truth, &scores)?,
                None => eval.add_miss(&truth)?,
            };
        }
    }
    Ok(eval.finalize())
}

/// One-hot vector of `label`; `None` when unlabeled, an error when unknown.
fn one_hot(label: Option<&str>, labels: &[String]) -> Result<Option<Vec<f64>>> {
    let Some(label) = label else {
        return Ok(None);
    };
    let class = labels.iter().position(|l| l == label).ok_or_else(|| {
        TopicSegError::InvalidParameter(format!("{:?} is not a known class", label))
    })?;
    let mut v = vec![0.0; labels.len()];
    v[class] = 1.0;
    Ok(Some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(classes: usize, k: usize, mode: AveragePrecisionMode) -> ClassificationEvaluator {
        let config = EvaluationConfig {
            top_k: k,
            average_precision: mode,
            ..Default::default()
        };
        ClassificationEvaluator::new(classes, &config).unwrap()
    }

    #[test]
    fn test_rank_descending() {
        assert_eq!(rank_descending(&[0.1, 0.7, 0.2]), vec![1, 2, 0]);
        assert_eq!(rank_descending(&[0.5, 0.5, 0.9]), vec![2, 0, 1]);
        assert_eq!(rank_descending(&[f64::NAN, 0.1, 0.3]), vec![2, 1, 0]);
    }

    #[test]
    fn test_perfect_ranking() {
        let mut eval = evaluator(4, 2, AveragePrecisionMode::PrimaryPositive);
        let s = eval
            .add_example(&[0.0, 1.0, 0.0, 0.0], &[0.1, 0.6, 0.2, 0.1])
            .unwrap();
        assert_eq!(s.average_precision, 1.0);
        assert_eq!(s.reciprocal_rank, 1.0);
        assert_eq!(s.precision_at_k, 0.5);
        assert_eq!(s.recall_at_k, 1.0);
    }

    #[test]
    fn test_positive_ranked_last() {
        let c = 5;
        let mut eval = evaluator(c, 3, AveragePrecisionMode::PrimaryPositive);
        let mut gold = vec![0.0; c];
        gold[4] = 1.0;
        let s = eval.add_example(&gold, &[0.5, 0.4, 0.3, 0.2, 0.1]).unwrap();
        assert!((s.average_precision - 1.0 / c as f64).abs() < 1e-12);
        assert!((s.reciprocal_rank - 0.2).abs() < 1e-12);
        assert_eq!(s.recall_at_k, 0.0);
    }

    #[test]
    fn test_no_positive_is_zero() {
        let mut eval = evaluator(3, 2, AveragePrecisionMode::MultiLabel);
        let s = eval.add_example(&[0.0, 0.0, 0.0], &[0.2, 0.3, 0.5]).unwrap();
        assert_eq!(s.average_precision, 0.0);
        assert_eq!(s.reciprocal_rank, 0.0);
        assert_eq!(s.recall_at_k, 0.0);

        let report = eval.finalize();
        assert!(report.map.is_finite());
        assert_eq!(report.per_class[2].counts.fp, 1);
    }

    #[test]
    fn test_multi_positive_modes() {
        let gold = [1.0, 0.0, 1.0, 0.0];
        let scores = [0.1, 0.9, 0.8, 0.05];
        // ranking: 1, 2, 0, 3 -> positives at ranks 2 and 3

        let mut primary = evaluator(4, 2, AveragePrecisionMode::PrimaryPositive);
        let s = primary.add_example(&gold, &scores).unwrap();
        assert!((s.average_precision - 1.0 / 3.0).abs() < 1e-12);

        let mut multi = evaluator(4, 2, AveragePrecisionMode::MultiLabel);
        let s = multi.add_example(&gold, &scores).unwrap();
        let expected = (1.0 / 2.0 + 2.0 / 3.0) / 2.0;
        assert!((s.average_precision - expected).abs() < 1e-12);
        assert!((s.recall_at_k - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_positive_modes_agree() {
        let gold = [0.0, 0.0, 1.0];
        let scores = [0.3, 0.5, 0.2];
        let mut a = evaluator(3, 2, AveragePrecisionMode::PrimaryPositive);
        let mut b = evaluator(3, 2, AveragePrecisionMode::MultiLabel);
        let sa = a.add_example(&gold, &scores).unwrap();
        let sb = b.add_example(&gold, &scores).unwrap();
        assert!((sa.average_precision - sb.average_precision).abs() < 1e-12);
    }

    #[test]
    fn test_recall_monotone_in_k() {
        let gold = [1.0, 0.0, 1.0, 0.0, 1.0];
        let scores = [0.1, 0.9, 0.3, 0.5, 0.2];
        let mut last = 0.0;
        for k in 1..=5 {
            let mut eval = evaluator(5, k, AveragePrecisionMode::MultiLabel);
            let s = eval.add_example(&gold, &scores).unwrap();
            assert!(s.recall_at_k >= last);
            last = s.recall_at_k;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_micro_macro() {
        let mut eval = evaluator(3, 1, AveragePrecisionMode::PrimaryPositive);
        // gold 0, predicted 0
        eval.add_example(&[1.0, 0.0, 0.0], &[0.8, 0.1, 0.1]).unwrap();
        // gold 0, predicted 1
        eval.add_example(&[1.0, 0.0, 0.0], &[0.2, 0.7, 0.1]).unwrap();
        // gold 1, predicted 1
        eval.add_example(&[0.0, 1.0, 0.0], &[0.1, 0.8, 0.1]).unwrap();

        let report = eval.finalize();
        assert_eq!(report.examples, 3);
        assert!((report.accuracy_at_1 - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.micro_precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.micro_recall - 2.0 / 3.0).abs() < 1e-12);

        // class 0: P 1, R 0.5; class 1: P 0.5, R 1; class 2: never predicted -> 0
        assert!((report.macro_precision - 0.5).abs() < 1e-12);
        assert!((report.macro_recall - 0.5).abs() < 1e-12);
        let f1_0 = 2.0 * 0.5 / 1.5;
        assert!((report.macro_f1 - (2.0 * f1_0) / 3.0).abs() < 1e-12);
        assert_eq!(report.per_class[2].f1, 0.0);
    }

    #[test]
    fn test_accuracy_at_k() {
        let mut eval = evaluator(4, 2, AveragePrecisionMode::PrimaryPositive);
        eval.add_example(&[0.0, 0.0, 1.0, 0.0], &[0.4, 0.1, 0.3, 0.2]).unwrap();
        eval.add_example(&[0.0, 0.0, 0.0, 1.0], &[0.4, 0.1, 0.3, 0.2]).unwrap();
        let report = eval.finalize();
        assert_eq!(report.accuracy_at_1, 0.0);
        assert!((report.accuracy_at_k - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_merge_equals_sequential() {
        let examples = [
            ([1.0, 0.0, 0.0], [0.6, 0.3, 0.1]),
            ([0.0, 1.0, 0.0], [0.6, 0.3, 0.1]),
            ([0.0, 0.0, 1.0], [0.1, 0.3, 0.6]),
        ];
        let mut sequential = evaluator(3, 2, AveragePrecisionMode::PrimaryPositive);
        for (g, s) in &examples {
            sequential.add_example(g, s).unwrap();
        }

        let mut left = evaluator(3, 2, AveragePrecisionMode::PrimaryPositive);
        let mut right = left.fork();
        left.add_example(&examples[0].0, &examples[0].1).unwrap();
        right.add_example(&examples[1].0, &examples[1].1).unwrap();
        right.add_example(&examples[2].0, &examples[2].1).unwrap();
        left.merge(&right).unwrap();

        assert_eq!(left.finalize(), sequential.finalize());
    }

    #[test]
    fn test_shape_errors() {
        let mut eval = evaluator(3, 1, AveragePrecisionMode::PrimaryPositive);
        assert!(eval.add_example(&[1.0, 0.0], &[0.5, 0.5, 0.0]).is_err());
        assert!(eval.add_example(&[1.0, 0.0, 0.0], &[0.5]).is_err());
        let other = evaluator(4, 1, AveragePrecisionMode::PrimaryPositive);
        assert!(eval.merge(&other).is_err());
        assert!(ClassificationEvaluator::new(0, &EvaluationConfig::default()).is_err());
    }

    #[test]
    fn test_labels_in_report() {
        let eval = evaluator(2, 1, AveragePrecisionMode::PrimaryPositive)
            .with_labels(vec!["a".to_string(), "b".to_string()])
            .unwrap();
        let report = eval.finalize();
        assert_eq!(report.per_class[1].label.as_deref(), Some("b"));
        assert_eq!(report.map, 0.0);
    }

    #[test]
    fn test_evaluate_segments() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let gold = vec![Segment::gold(0, 4, "a"), Segment::gold(4, 8, "b")];
        let mut first = Segment::gold(0, 6, "a");
        first.source = crate::segmentation::Provenance::Pred;
        let mut second = Segment::gold(6, 8, "b");
        second.source = crate::segmentation::Provenance::Pred;

        let scores =
            evaluate_segments(&gold, &[first, second], &labels, &EvaluationConfig::default())
                .unwrap();
        assert_eq!(scores.examples, 8);
        assert!((scores.accuracy_at_1 - 0.75).abs() < 1e-12);
        assert_eq!(scores.per_class[0].counts.fp, 2);
        assert_eq!(scores.per_class[1].counts.fn_, 2);
    }

    #[test]
    fn test_evaluate_segments_rejects_mismatched_lengths() {
        let labels = vec!["a".to_string()];
        let gold = vec![Segment::gold(0, 4, "a")];
        let pred = vec![Segment::gold(0, 3, "a")];
        assert!(evaluate_segments(&gold, &pred, &labels, &EvaluationConfig::default()).is_err());

        let pred = vec![Segment::gold(0, 4, "z")];
        assert!(matches!(
            evaluate_segments(&gold, &pred, &labels, &EvaluationConfig::default()),
            Err(TopicSegError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unlabeled_prediction_is_a_miss() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let gold = vec![Segment::gold(0, 4, "a")];
        let predicted = vec![Segment::new(0, 4, crate::segmentation::Provenance::Pred)];

        let scores =
            evaluate_segments(&gold, &predicted, &labels, &EvaluationConfig::default()).unwrap();
        assert_eq!(scores.examples, 4);
        assert_eq!(scores.accuracy_at_1, 0.0);
        assert_eq!(scores.mrr, 0.0);
        assert_eq!(scores.map, 0.0);
        assert_eq!(scores.micro_f1, 0.0);
        assert_eq!(scores.per_class[0].counts.tp, 0);
        assert_eq!(scores.per_class[0].counts.fn_, 4);
        assert_eq!(scores.per_class[1].counts.fp, 0);
    }

    #[test]
    fn test_add_miss_checks_length() {
        let mut eval = evaluator(3, 2, AveragePrecisionMode::PrimaryPositive);
        assert!(eval.add_miss(&[1.0, 0.0]).is_err());
        let s = eval.add_miss(&[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(s.reciprocal_rank, 0.0);
        let fin = eval.finalize();
        assert_eq!(fin.examples, 1);
        assert_eq!(fin.per_class[1].counts.fn_, 1);
        assert_eq!(fin.recall_at_k, 0.0);
    }
}
