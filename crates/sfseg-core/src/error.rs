//! Error taxonomy for the segmentation engine
//!
//! Every fallible operation in this crate surfaces one of these variants
//! synchronously; there is no silent recovery inside the pipeline.

use thiserror::Error;

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum SegmenterError {
    /// Feature matrix too short for the requested embedding dimension.
    #[error("feature matrix has {frames} frames, need at least {required} to embed")]
    InsufficientLength { frames: usize, required: usize },

    /// A row has zero range under the min-max normalization policy.
    #[error("row {row} has zero range, cannot min-max normalize")]
    DegenerateRow { row: usize },

    /// Finalized boundaries violate the first == 0 / last == T-1 invariant.
    /// Treated as a programming/data error, never retried.
    #[error("boundary alignment failed: {reason}")]
    BoundaryAlignment { reason: String },

    /// Invalid hyperparameter value.
    #[error("invalid configuration `{name}`: got {value}, {reason}")]
    Config {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Convenience Result type for sfseg operations.
pub type Result<T> = std::result::Result<T, SegmenterError>;
