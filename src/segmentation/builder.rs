//! Run-length segment construction from boundary indicators.

use crate::error::{Result, TopicSegError};
use crate::segmentation::{Provenance, Segment};
use crate::signal::EdgeVector;
use log::warn;

/// Converts boundary indicators into an ordered, gap-free segment list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentBuilder;

impl SegmentBuilder {
    /// Builds predicted segments for a document of `sentence_count` sentences.
    ///
    /// A new segment opens at every boundary (sentence 0 always opens one)
    /// and the last open segment closes at the document end. Without an edge
    /// vector, or for a single sentence, the whole document is one segment.
    /// An empty document yields no segments.
    pub fn build(sentence_count: usize, edges: Option<&EdgeVector>) -> Result<Vec<Segment>> {
        if sentence_count == 0 {
            warn!("document has no sentences, no segments produced");
            return Ok(Vec::new());
        }

        let edges = match edges {
            Some(edges) if sentence_count > 1 => edges,
            _ => return Ok(vec![Segment::new(0, sentence_count, Provenance::Pred)]),
        };

        if edges.len() != sentence_count {
            return Err(TopicSegError::mismatch(sentence_count, edges.len()));
        }

        let mut segments = Vec::new();
        let mut start = 0;
        for t in 1..sentence_count {
            if edges.is_boundary(t) {
                segments.push(Segment::new(start, t, Provenance::Pred));
                start = t;
            }
        }
        segments.push(Segment::new(start, sentence_count, Provenance::Pred));

        Ok(segments)
    }
}
