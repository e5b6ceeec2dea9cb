//! Configuration parameters for the segmentation engine
//!
//! The defaults are an empirically tuned parameterization; the
//! pipeline is sensitive to `gaussian_kernel_size`, `peak_window_size`,
//! `peak_offset_fraction` and `embedding_dimension` in particular, so they
//! are carried as configuration rather than derived.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SegmenterError};

/// Feature normalization policy applied before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormPolicy {
    /// Row-wise rescale by each row's own min/max.
    MinMax,
    /// Decibel scaling, clipped at `max_db + min_db`.
    Log,
    /// Divide each row by its Lp norm. The exponent may be `inf` (max
    /// absolute value), `-inf` (min absolute value), `0` (non-zero count)
    /// or any positive float.
    Lp(f32),
    /// Pass features through untouched.
    None,
}

impl Default for NormPolicy {
    fn default() -> Self {
        NormPolicy::Lp(f32::INFINITY)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Number of consecutive frames stacked into one embedded row.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Fraction of embedded rows taken as nearest neighbors, in (0, 1).
    #[serde(default = "default_neighbor_fraction")]
    pub neighbor_fraction: f32,

    /// Width of the Gaussian used on the time-lag matrix, in frames.
    #[serde(default = "default_gaussian_kernel_size")]
    pub gaussian_kernel_size: usize,

    /// Window of the adaptive threshold for peak picking, in frames.
    #[serde(default = "default_peak_window_size")]
    pub peak_window_size: usize,

    /// Offset coefficient added to the adaptive threshold.
    #[serde(default = "default_peak_offset_fraction")]
    pub peak_offset_fraction: f32,

    /// Normalization policy for the incoming feature matrix.
    #[serde(default)]
    pub normalization: NormPolicy,

    /// Replacement value for zeros (log policy) and lower bound of the
    /// min-max rescale.
    #[serde(default = "default_norm_floor")]
    pub norm_floor: f32,

    /// Clip level below the maximum, in dB, for the log policy.
    #[serde(default = "default_norm_min_db")]
    pub norm_min_db: f32,

    /// Tracks with at most this many frames skip structure analysis and
    /// return `[0, T-1]` directly.
    #[serde(default = "default_short_track_threshold")]
    pub short_track_threshold: usize,

    /// Cap on the transitive-closure matrix-power iteration when labeling.
    #[serde(default = "default_label_max_iterations")]
    pub label_max_iterations: usize,
}

fn default_embedding_dimension() -> usize {
    30
}
fn default_neighbor_fraction() -> f32 {
    0.04
}
fn default_gaussian_kernel_size() -> usize {
    100
}
fn default_peak_window_size() -> usize {
    100
}
fn default_peak_offset_fraction() -> f32 {
    0.1
}
fn default_norm_floor() -> f32 {
    0.0
}
fn default_norm_min_db() -> f32 {
    -80.0
}
fn default_short_track_threshold() -> usize {
    20
}
fn default_label_max_iterations() -> usize {
    100
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: default_embedding_dimension(),
            neighbor_fraction: default_neighbor_fraction(),
            gaussian_kernel_size: default_gaussian_kernel_size(),
            peak_window_size: default_peak_window_size(),
            peak_offset_fraction: default_peak_offset_fraction(),
            normalization: NormPolicy::default(),
            norm_floor: default_norm_floor(),
            norm_min_db: default_norm_min_db(),
            short_track_threshold: default_short_track_threshold(),
            label_max_iterations: default_label_max_iterations(),
        }
    }
}

impl SegmenterConfig {
    /// Validate hyperparameters. Data-dependent checks (e.g. the embedding
    /// dimension against the track length) happen inside the pipeline.
    pub fn validate(&self) -> Result<()> {
        if !(self.neighbor_fraction > 0.0 && self.neighbor_fraction < 1.0) {
            return Err(SegmenterError::Config {
                name: "neighbor_fraction",
                value: self.neighbor_fraction.to_string(),
                reason: "must lie in (0, 1)",
            });
        }
        if self.embedding_dimension == 0 {
            return Err(SegmenterError::Config {
                name: "embedding_dimension",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if self.gaussian_kernel_size == 0 {
            return Err(SegmenterError::Config {
                name: "gaussian_kernel_size",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if self.peak_window_size == 0 {
            return Err(SegmenterError::Config {
                name: "peak_window_size",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if !self.peak_offset_fraction.is_finite() || self.peak_offset_fraction < 0.0 {
            return Err(SegmenterError::Config {
                name: "peak_offset_fraction",
                value: self.peak_offset_fraction.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        if self.label_max_iterations == 0 {
            return Err(SegmenterError::Config {
                name: "label_max_iterations",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if let NormPolicy::Lp(p) = self.normalization {
            if p.is_nan() || (p < 0.0 && p.is_finite()) {
                return Err(SegmenterError::Config {
                    name: "normalization",
                    value: p.to_string(),
                    reason: "Lp exponent must be inf, -inf, 0 or positive",
                });
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SegmenterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
