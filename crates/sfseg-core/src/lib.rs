//! sfseg Core - Music Structure Segmentation Library
//!
//! This crate implements unsupervised structural segmentation of music
//! tracks from a structural-features recurrence analysis: a feature matrix
//! goes through normalization, time-delay embedding, k-nearest-neighbor
//! recurrence, a circular lag transform and Gaussian smoothing; section
//! boundaries are the peaks of the resulting novelty curve, and repeated
//! sections can optionally be grouped under shared labels.

pub mod boundaries;
pub mod config;
pub mod convert;
pub mod embedding;
pub mod error;
pub mod filtering;
pub mod labeling;
pub mod normalize;
pub mod novelty;
pub mod recurrence;
pub mod segmenter;

pub use config::{NormPolicy, SegmenterConfig};
pub use convert::frames_to_time;
pub use error::{Result, SegmenterError};
pub use segmenter::{Segmentation, SegmentationTrace, Segmenter};

/// Segment a frame-major feature matrix in one call.
pub fn segment(
    features: &ndarray::Array2<f32>,
    config: &SegmenterConfig,
    with_labels: bool,
) -> Result<Segmentation> {
    Segmenter::new(config.clone())?.segment(features, with_labels)
}
