//! Time-delay embedding
//!
//! Stacks `m` consecutive frames into one row so that recurrence distances
//! compare short temporal contexts instead of isolated frames.

use ndarray::Array2;

use crate::error::{Result, SegmenterError};

/// Embed a frame-major feature matrix (`T x D`) into delay coordinates.
///
/// Row `i` of the result is the concatenation of frames `i .. i + m`, so
/// the output has shape `(T - m + 1) x (D * m)`.
pub fn embed(x: &Array2<f32>, m: usize) -> Result<Array2<f32>> {
    let t = x.nrows();
    let d = x.ncols();
    if m == 0 {
        return Err(SegmenterError::Config {
            name: "embedding_dimension",
            value: "0".to_string(),
            reason: "must be at least 1",
        });
    }
    if t < m {
        return Err(SegmenterError::InsufficientLength {
            frames: t,
            required: m,
        });
    }

    let n = t - m + 1;
    let mut out = Array2::zeros((n, d * m));
    for i in 0..n {
        for j in 0..m {
            for k in 0..d {
                out[[i, j * d + k]] = x[[i + j, k]];
            }
        }
    }
    Ok(out)
}
