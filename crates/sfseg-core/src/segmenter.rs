//! Top-level segmentation pipeline
//!
//! Normalizes the feature matrix, embeds it in delay coordinates, builds a
//! k-NN recurrence matrix, converts it to lag space, smooths it into
//! structural features and picks boundaries off the resulting novelty
//! curve. Labeling and intermediate-matrix capture are opt-in.

use ndarray::Array2;

use crate::boundaries;
use crate::config::SegmenterConfig;
use crate::embedding;
use crate::error::{Result, SegmenterError};
use crate::filtering;
use crate::labeling;
use crate::normalize;
use crate::novelty;
use crate::recurrence;

/// Result of segmenting one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Sorted frame indices; always starts at 0 and ends at `T - 1`.
    pub boundaries: Vec<usize>,
    /// One label per segment between consecutive boundaries, when requested.
    pub labels: Option<Vec<usize>>,
}

/// Intermediate matrices captured for diagnostics.
#[derive(Debug, Clone)]
pub struct SegmentationTrace {
    pub embedded: Array2<f32>,
    pub recurrence: Array2<f32>,
    pub lag: Array2<f32>,
    pub structural: Array2<f32>,
    pub novelty: Vec<f32>,
    pub raw_peaks: Vec<usize>,
}

/// Stateless segmentation engine; one instance may serve many tracks.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create an engine from a validated configuration.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment a frame-major feature matrix (`T x D`).
    pub fn segment(&self, features: &Array2<f32>, with_labels: bool) -> Result<Segmentation> {
        let (segmentation, _) = self.run(features, with_labels, false)?;
        Ok(segmentation)
    }

    /// Segment a track and capture the intermediate matrices.
    ///
    /// The trace is `None` when the short-track or flat-track path is taken,
    /// since those paths never build the matrices.
    pub fn segment_with_trace(
        &self,
        features: &Array2<f32>,
        with_labels: bool,
    ) -> Result<(Segmentation, Option<SegmentationTrace>)> {
        self.run(features, with_labels, true)
    }

    fn run(
        &self,
        features: &Array2<f32>,
        with_labels: bool,
        with_trace: bool,
    ) -> Result<(Segmentation, Option<SegmentationTrace>)> {
        let t = features.nrows();
        if t == 0 {
            return Err(SegmenterError::InsufficientLength {
                frames: 0,
                required: 1,
            });
        }

        if t <= self.config.short_track_threshold {
            log::debug!("track of {t} frames is below the structure threshold");
            return Ok((trivial_result(t, with_labels), None));
        }

        let normalized = normalize::normalize(
            features,
            self.config.normalization,
            self.config.norm_floor,
            self.config.norm_min_db,
        )?;

        let embedded = embedding::embed(&normalized, self.config.embedding_dimension)?;
        if is_flat(&embedded) {
            // No structure to recover; the recurrence matrix would tie every
            // pair and smoothing artifacts could fake a boundary.
            log::debug!("embedded rows are identical, returning endpoints only");
            return Ok((trivial_result(t, with_labels), None));
        }

        let r = recurrence::build(&embedded, self.config.neighbor_fraction);
        let lag = recurrence::to_lag(&r);
        let structural = filtering::structural_features(&lag, self.config.gaussian_kernel_size);
        let nc = novelty::novelty_curve(&structural);
        let raw_peaks = novelty::find_peaks(
            &nc,
            self.config.peak_window_size,
            self.config.peak_offset_fraction,
        );
        log::debug!(
            "{} embedded rows, {} raw novelty peaks",
            embedded.nrows(),
            raw_peaks.len()
        );

        let bounds = boundaries::finalize(&raw_peaks, self.config.embedding_dimension, t)?;
        let labels = with_labels
            .then(|| labeling::label(&bounds, &r, self.config.label_max_iterations));

        let trace = with_trace.then(|| SegmentationTrace {
            embedded,
            recurrence: r,
            lag,
            structural,
            novelty: nc,
            raw_peaks,
        });

        Ok((
            Segmentation {
                boundaries: bounds,
                labels,
            },
            trace,
        ))
    }
}

/// Endpoint-only result for tracks too short or too flat to analyze.
fn trivial_result(t: usize, with_labels: bool) -> Segmentation {
    let boundaries = if t == 1 { vec![0] } else { vec![0, t - 1] };
    let labels = with_labels.then(|| if t == 1 { Vec::new() } else { vec![0] });
    Segmentation { boundaries, labels }
}

fn is_flat(embedded: &Array2<f32>) -> bool {
    let first = embedded.row(0);
    embedded.rows().into_iter().all(|r| r == first)
}

#[cfg(test)]
mod tests;
