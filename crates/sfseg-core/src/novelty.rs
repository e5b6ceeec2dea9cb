//! Novelty curve and adaptive peak picking

use ndarray::Array2;

use crate::filtering::median_filter1d;

/// Frame-to-frame novelty of the structural features.
///
/// The curve is the Euclidean distance between consecutive time rows,
/// padded with a trailing zero to keep one value per frame, then shifted
/// and scaled into `[0, 1]`. A constant input yields an all-zero curve.
pub fn novelty_curve(sf: &Array2<f32>) -> Vec<f32> {
    let n = sf.nrows();
    let mut nc = Vec::with_capacity(n);
    for i in 0..n.saturating_sub(1) {
        let a = sf.row(i);
        let b = sf.row(i + 1);
        let d2: f32 = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum();
        nc.push(d2.sqrt());
    }
    if n > 0 {
        nc.push(0.0);
    }

    let max = nc.iter().cloned().fold(0.0f32, f32::max);
    if max > 0.0 {
        let min = nc.iter().cloned().fold(f32::INFINITY, f32::min);
        for v in &mut nc {
            *v -= min;
        }
        let max = nc.iter().cloned().fold(0.0f32, f32::max);
        if max > 0.0 {
            for v in &mut nc {
                *v /= max;
            }
        }
    }
    nc
}

/// Pick strict local maxima that clear a running-median threshold.
///
/// The threshold at each frame is the windowed median of the curve plus
/// `offset_fraction` times the curve's mean, so louder tracks demand
/// proportionally more prominent peaks.
pub fn find_peaks(nc: &[f32], window_size: usize, offset_fraction: f32) -> Vec<usize> {
    let n = nc.len();
    if n < 3 {
        return Vec::new();
    }
    let mean = nc.iter().sum::<f32>() / n as f32;
    let offset = mean * offset_fraction;
    let threshold = median_filter1d(nc, window_size);

    let mut peaks = Vec::new();
    for i in 1..n - 1 {
        if nc[i] > nc[i - 1] && nc[i] > nc[i + 1] && nc[i] > threshold[i] + offset {
            peaks.push(i);
        }
    }
    peaks
}
