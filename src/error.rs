//! Error types for the topic segmentation engine.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for segmentation and evaluation operations.
#[derive(Error, Debug)]
pub enum TopicSegError {
    /// A segmentation or position array violates its ordering invariants.
    #[error("Invalid segmentation: {0}")]
    InvalidSegmentation(String),

    /// A parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two inputs that must agree in shape do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected length or dimension.
        expected: usize,
        /// The length or dimension that was supplied.
        actual: usize,
    },

    /// Empty input.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for topic segmentation operations.
pub type Result<T> = std::result::Result<T, TopicSegError>;

impl TopicSegError {
    /// Shorthand for a [`TopicSegError::DimensionMismatch`].
    pub(crate) fn mismatch(expected: usize, actual: usize) -> Self {
        TopicSegError::DimensionMismatch { expected, actual }
    }
}
