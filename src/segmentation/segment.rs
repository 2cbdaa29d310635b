//! Segments and segmentation validity checks.

use crate::error::{Result, TopicSegError};
use serde::{Deserialize, Serialize};

/// Where a segment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Gold annotation.
    Gold,
    /// Produced by the segmenter.
    Pred,
}

/// A contiguous span of sentences `[begin, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Index of the first sentence.
    pub begin: usize,
    /// Index after the last sentence (exclusive).
    pub end: usize,
    /// Topic label or heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Confidence of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Gold or predicted.
    pub source: Provenance,
}

impl Segment {
    /// Creates an unlabeled segment.
    pub fn new(begin: usize, end: usize, source: Provenance) -> Self {
        Self {
            begin,
            end,
            label: None,
            confidence: None,
            source,
        }
    }

    /// Creates a gold segment with a label.
    pub fn gold(begin: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(begin, end, Provenance::Gold)
        }
    }

    /// Number of sentences covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// True when the segment covers no sentence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Whether sentence `index` lies inside the segment.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.begin && index < self.end
    }
}

/// Checks that `segments` are ordered, non-empty, non-overlapping and
/// jointly cover `[0, sentence_count)`.
pub fn validate_segmentation(segments: &[Segment], sentence_count: usize) -> Result<()> {
    if sentence_count == 0 {
        if segments.is_empty() {
            return Ok(());
        }
        return Err(TopicSegError::InvalidSegmentation(format!(
            "{} segments for an empty document",
            segments.len()
        )));
    }

    let mut expected_begin = 0;
    for (i, segment) in segments.iter().enumerate() {
        if segment.begin != expected_begin {
            return Err(TopicSegError::InvalidSegmentation(format!(
                "segment {} starts at {} but the previous one ended at {}",
                i, segment.begin, expected_begin
            )));
        }
        if segment.is_empty() {
            return Err(TopicSegError::InvalidSegmentation(format!(
                "segment {} [{}, {}) is empty",
                i, segment.begin, segment.end
            )));
        }
        expected_begin = segment.end;
    }

    if expected_begin != sentence_count {
        return Err(TopicSegError::InvalidSegmentation(format!(
            "segments cover [0, {}) but the document has {} sentences",
            expected_begin, sentence_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(bounds: &[(usize, usize)]) -> Vec<Segment> {
        bounds
            .iter()
            .map(|&(b, e)| Segment::new(b, e, Provenance::Pred))
            .collect()
    }

    #[test]
    fn test_valid_partition() {
        let segments = spans(&[(0, 4), (4, 8), (8, 13)]);
        assert!(validate_segmentation(&segments, 13).is_ok());
    }

    #[test]
    fn test_gap_rejected() {
        let segments = spans(&[(0, 4), (5, 13)]);
        assert!(matches!(
            validate_segmentation(&segments, 13),
            Err(TopicSegError::InvalidSegmentation(_))
        ));
    }

    #[test]
    fn test_overlap_rejected() {
        let segments = spans(&[(0, 5), (4, 13)]);
        assert!(validate_segmentation(&segments, 13).is_err());
    }

    #[test]
    fn test_short_cover_rejected() {
        let segments = spans(&[(0, 4), (4, 10)]);
        assert!(validate_segmentation(&segments, 13).is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(validate_segmentation(&[], 0).is_ok());
        assert!(validate_segmentation(&spans(&[(0, 1)]), 0).is_err());
    }

    #[test]
    fn test_segment_accessors() {
        let s = Segment::gold(3, 7, "History");
        assert_eq!(s.len(), 4);
        assert!(s.contains(3));
        assert!(!s.contains(7));
        assert_eq!(s.label.as_deref(), Some("History"));
        assert_eq!(s.source, Provenance::Gold);
    }
}
