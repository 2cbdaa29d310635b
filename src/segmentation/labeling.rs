//! Topic labels for predicted segments from per-sentence class scores.

use crate::error::{Result, TopicSegError};
use crate::segmentation::Segment;
use ndarray::{Array2, ArrayView1, Axis};

/// Mean class-score vector of every segment.
///
/// `scores` holds one row per sentence and one column per class.
pub fn segment_scores(segments: &[Segment], scores: &Array2<f64>) -> Result<Array2<f64>> {
    let classes = scores.ncols();
    let mut out = Array2::<f64>::zeros((segments.len(), classes));
    for (row, segment) in segments.iter().enumerate() {
        if segment.end > scores.nrows() {
            return Err(TopicSegError::mismatch(segment.end, scores.nrows()));
        }
        if segment.is_empty() {
            continue;
        }
        let block = scores.slice(ndarray::s![segment.begin..segment.end, ..]);
        if let Some(mean) = block.mean_axis(Axis(0)) {
            out.row_mut(row).assign(&mean);
        }
    }
    Ok(out)
}

/// Assigns each segment the class with the highest mean score, and that
/// mean as its confidence. Ties go to the lower class index.
pub fn label_segments(
    segments: &mut [Segment],
    scores: &Array2<f64>,
    labels: &[String],
) -> Result<()> {
    if scores.ncols() != labels.len() {
        return Err(TopicSegError::mismatch(labels.len(), scores.ncols()));
    }
    let means = segment_scores(segments, scores)?;
    for (segment, row) in segments.iter_mut().zip(means.outer_iter()) {
        if let Some((class, score)) = argmax(row) {
            segment.label = Some(labels[class].clone());
            segment.confidence = Some(score);
        }
    }
    Ok(())
}

/// Index and value of the largest finite entry, lowest index on ties.
pub fn argmax(values: ArrayView1<'_, f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::Provenance;
    use ndarray::array;

    #[test]
    fn test_label_segments() {
        let scores = array![
            [0.9, 0.1],
            [0.7, 0.3],
            [0.2, 0.8],
            [0.4, 0.6],
            [0.1, 0.9]
        ];
        let labels = vec!["intro".to_string(), "method".to_string()];
        let mut segments = vec![
            Segment::new(0, 2, Provenance::Pred),
            Segment::new(2, 5, Provenance::Pred),
        ];
        label_segments(&mut segments, &scores, &labels).unwrap();

        assert_eq!(segments[0].label.as_deref(), Some("intro"));
        assert!((segments[0].confidence.unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(segments[1].label.as_deref(), Some("method"));
        assert!((segments[1].confidence.unwrap() - 0.7666666666666667).abs() < 1e-12);
    }

    #[test]
    fn test_label_count_mismatch() {
        let scores = Array2::<f64>::zeros((3, 2));
        let mut segments = vec![Segment::new(0, 3, Provenance::Pred)];
        assert!(label_segments(&mut segments, &scores, &["a".to_string()]).is_err());
    }

    #[test]
    fn test_segment_out_of_range() {
        let scores = Array2::<f64>::zeros((3, 2));
        let segments = vec![Segment::new(0, 4, Provenance::Pred)];
        assert!(segment_scores(&segments, &scores).is_err());
    }

    #[test]
    fn test_argmax_ties_and_nan() {
        let v = array![0.5, f64::NAN, 0.5, 0.2];
        assert_eq!(argmax(v.view()).map(|(i, _)| i), Some(0));
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(argmax(empty.view()).is_none());
    }
}
