//! Signal processing over per-sentence embedding trajectories.
//!
//! The pipeline reduces the embeddings to a few principal directions,
//! low-pass filters them along time, derives a scalar deviation series and
//! finally picks boundary positions from that series.

pub mod deviation;
mod edges;
mod pca;
mod smoothing;

pub use edges::{EdgeDetector, EdgeVector};
pub use pca::{zero_leading_columns, PcaReducer};
pub use smoothing::GaussianSmoother;
