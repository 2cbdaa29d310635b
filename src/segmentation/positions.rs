//! Sentence-to-segment id arrays used by the boundary metrics.

use crate::config::MergePolicy;
use crate::error::{Result, TopicSegError};
use crate::segmentation::{validate_segmentation, Segment};

/// Marker for a sentence that no segment covers.
pub const UNSET: usize = usize::MAX;

/// Maps every sentence of a document to a segment id.
///
/// Ids are non-decreasing, grow by exactly one at each boundary and are
/// never [`UNSET`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionArray(Vec<usize>);

impl PositionArray {
    /// Validates raw ids.
    pub fn new(ids: Vec<usize>) -> Result<Self> {
        if let Some(i) = ids.iter().position(|&id| id == UNSET) {
            return Err(TopicSegError::InvalidSegmentation(format!(
                "sentence {} is not assigned to any segment",
                i
            )));
        }
        if let Some(i) = ids.windows(2).position(|w| w[1] < w[0]) {
            return Err(TopicSegError::InvalidSegmentation(format!(
                "segment ids decrease between sentences {} and {} ({} -> {})",
                i,
                i + 1,
                ids[i],
                ids[i + 1]
            )));
        }
        if let Some(i) = ids.windows(2).position(|w| w[1] > w[0] + 1) {
            return Err(TopicSegError::InvalidSegmentation(format!(
                "segment ids skip from {} to {} between sentences {} and {}",
                ids[i],
                ids[i + 1],
                i,
                i + 1
            )));
        }
        Ok(Self(ids))
    }

    /// Builds ids from an ordered segmentation of `sentence_count` sentences.
    ///
    /// The segments must partition the document (see
    /// [`validate_segmentation`]).
    ///
    /// With [`MergePolicy::MergeSameLabel`] adjacent segments carrying the
    /// same label share an id; unlabeled segments never merge.
    pub fn from_segments(
        segments: &[Segment],
        sentence_count: usize,
        merge: MergePolicy,
    ) -> Result<Self> {
        validate_segmentation(segments, sentence_count)?;

        let mut ids = vec![UNSET; sentence_count];
        let mut id = 0usize;
        let mut previous: Option<&Segment> = None;

        for segment in segments {
            if let Some(prev) = previous {
                let same_label = merge == MergePolicy::MergeSameLabel
                    && prev.label.is_some()
                    && prev.label == segment.label;
                if !same_label {
                    id += 1;
                }
            }
            for slot in &mut ids[segment.begin..segment.end] {
                *slot = id;
            }
            previous = Some(segment);
        }

        Self::new(ids)
    }

    /// Number of sentences.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-sentence document.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct segment ids.
    pub fn segment_count(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        1 + self.0.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Indices `t > 0` where the id changes from `t - 1`.
    pub fn boundaries(&self) -> Vec<usize> {
        self.0
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// The raw ids.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl std::ops::Index<usize> for PositionArray {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}
