//! Topic segmentation from sentence embeddings.
//!
//! [`EmbeddingSegmenter`] runs the signal pipeline and [`SegmentBuilder`]
//! turns its boundary indicators into segments. Evaluation consumes the
//! result only through [`Segment`] and [`PositionArray`].

mod builder;
pub mod labeling;
mod positions;
mod segment;
mod segmenter;

pub use builder::SegmentBuilder;
pub use labeling::label_segments;
pub use positions::{PositionArray, UNSET};
pub use segment::{validate_segmentation, Provenance, Segment};
pub use segmenter::{DocumentEmbeddings, EmbeddingSegmenter, SegmentationResult};
