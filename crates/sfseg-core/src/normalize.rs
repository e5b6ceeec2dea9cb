//! Feature normalization
//!
//! Rows are analysis frames, columns are feature dimensions. Each policy
//! operates per row so that frames with very different dynamic ranges
//! contribute comparably to the recurrence distances downstream.

use ndarray::Array2;

use crate::config::NormPolicy;
use crate::error::{Result, SegmenterError};

/// Apply the configured normalization policy to a feature matrix.
///
/// `floor` replaces exact zeros for [`NormPolicy::Log`] and is the lower
/// bound of the [`NormPolicy::MinMax`] rescale; `min_db` is the clip level
/// below the global maximum for [`NormPolicy::Log`].
pub fn normalize(
    x: &Array2<f32>,
    policy: NormPolicy,
    floor: f32,
    min_db: f32,
) -> Result<Array2<f32>> {
    match policy {
        NormPolicy::MinMax => min_max(x, floor),
        NormPolicy::Log => Ok(log_scale(x, floor, min_db)),
        NormPolicy::Lp(p) => Ok(lp_rows(x, p)),
        NormPolicy::None => Ok(x.clone()),
    }
}

fn min_max(x: &Array2<f32>, floor: f32) -> Result<Array2<f32>> {
    let mut out = x.clone();
    for (row, mut r) in out.rows_mut().into_iter().enumerate() {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in r.iter() {
            min = min.min(v);
            max = max.max(v);
        }
        if max == min {
            return Err(SegmenterError::DegenerateRow { row });
        }
        let range = max - min;
        r.mapv_inplace(|v| floor + (v - min) / range);
    }
    Ok(out)
}

fn log_scale(x: &Array2<f32>, floor: f32, min_db: f32) -> Array2<f32> {
    let mut out = x.mapv(|v| {
        let v = if v == 0.0 { floor } else { v };
        10.0 * v.abs().log10()
    });
    let max_db = out.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    if !max_db.is_finite() {
        // Every entry was zero with a zero floor; nothing to scale against.
        return Array2::zeros(x.raw_dim());
    }
    let clip = max_db + min_db;
    out.mapv_inplace(|v| v.max(clip));
    out
}

fn lp_rows(x: &Array2<f32>, p: f32) -> Array2<f32> {
    let mut out = x.clone();
    for mut r in out.rows_mut() {
        let norm = if p == f32::INFINITY {
            r.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
        } else if p == f32::NEG_INFINITY {
            r.iter().fold(f32::INFINITY, |acc, v| acc.min(v.abs()))
        } else if p == 0.0 {
            r.iter().filter(|v| **v != 0.0).count() as f32
        } else {
            r.iter().map(|v| v.abs().powf(p)).sum::<f32>().powf(1.0 / p)
        };
        // A zero or non-finite norm leaves the row untouched rather than
        // producing NaNs.
        if norm > f32::MIN_POSITIVE && norm.is_finite() {
            r.mapv_inplace(|v| v / norm);
        }
    }
    out
}
