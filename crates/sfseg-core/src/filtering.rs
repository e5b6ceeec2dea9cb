//! Smoothing filters and the structural-feature transform
//!
//! Both 1-D filters use reflect boundary handling (`x[-1] == x[0]`) so that
//! edge frames are smoothed against mirrored copies of themselves instead
//! of an implicit zero pad.

use ndarray::Array2;

/// Reflect an out-of-range index back into `0 .. n`.
fn reflect(idx: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let mut i = idx.rem_euclid(period);
    if i >= n {
        i = period - 1 - i;
    }
    i as usize
}

/// Gaussian smoothing with a truncated kernel of radius `floor(4*sigma + 0.5)`.
pub fn gaussian_filter1d(x: &[f32], sigma: f32) -> Vec<f32> {
    let n = x.len();
    if n == 0 || sigma <= 0.0 {
        return x.to_vec();
    }
    let radius = (4.0 * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let denom = 2.0 * sigma * sigma;
    for i in 0..=2 * radius {
        let d = i as f32 - radius as f32;
        kernel.push((-d * d / denom).exp());
    }
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }

    let mut out = vec![0.0; n];
    for (i, o) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (t, w) in kernel.iter().enumerate() {
            let src = i as isize + t as isize - radius as isize;
            acc += w * x[reflect(src, n)];
        }
        *o = acc;
    }
    out
}

/// Running median with a window of `size` samples.
///
/// For even sizes the window extends one further to the right and the rank
/// taken is the upper of the two middle elements.
pub fn median_filter1d(x: &[f32], size: usize) -> Vec<f32> {
    let n = x.len();
    if n == 0 || size <= 1 {
        return x.to_vec();
    }
    let left = size / 2;
    let mut out = vec![0.0; n];
    let mut window = Vec::with_capacity(size);
    for (i, o) in out.iter_mut().enumerate() {
        window.clear();
        for off in 0..size {
            let src = i as isize + off as isize - left as isize;
            window.push(x[reflect(src, n)]);
        }
        window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        *o = window[size / 2];
    }
    out
}

/// Two-pass Gaussian filter over the time-lag matrix.
///
/// First each lag row is smoothed along the time axis with a wide kernel
/// (`sigma = kernel_size / 2`); the result is transposed to time-major and
/// each row smoothed along the lag axis with a narrow `sigma = 0.5`. Rows
/// of the returned matrix correspond to time frames.
pub fn structural_features(lag: &Array2<f32>, kernel_size: usize) -> Array2<f32> {
    let mut work = lag.clone();
    let sigma_time = kernel_size as f32 / 2.0;
    for mut row in work.rows_mut() {
        let smoothed = gaussian_filter1d(&row.to_vec(), sigma_time);
        for (dst, src) in row.iter_mut().zip(smoothed) {
            *dst = src;
        }
    }

    let mut sf = work.t().to_owned();
    for mut row in sf.rows_mut() {
        let smoothed = gaussian_filter1d(&row.to_vec(), 0.5);
        for (dst, src) in row.iter_mut().zip(smoothed) {
            *dst = src;
        }
    }
    sf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;

    #[test]
    fn test_reflect_boundary_indices() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        assert_eq!(reflect(2, 5), 2);
    }

    #[test]
    fn test_gaussian_preserves_constant_signal() {
        let x = vec![3.0; 16];
        let out = gaussian_filter1d(&x, 2.5);
        for v in out {
            assert_abs_diff_eq!(v, 3.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_gaussian_zero_sigma_is_identity() {
        let x = vec![1.0, 5.0, 2.0];
        assert_eq!(gaussian_filter1d(&x, 0.0), x);
    }

    #[test]
    fn test_gaussian_smooths_an_impulse() {
        let mut x = vec![0.0; 11];
        x[5] = 1.0;
        let out = gaussian_filter1d(&x, 1.0);
        // Mass spreads symmetrically around the impulse
        assert!(out[5] > out[4]);
        assert_abs_diff_eq!(out[4], out[6], epsilon = 1e-6);
        assert_abs_diff_eq!(out.iter().sum::<f32>(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_median_filter_suppresses_outlier() {
        let x = vec![1.0, 1.0, 9.0, 1.0, 1.0];
        let out = median_filter1d(&x, 3);
        assert_eq!(out, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_median_filter_size_one_is_identity() {
        let x = vec![4.0, 2.0, 7.0];
        assert_eq!(median_filter1d(&x, 1), x);
    }

    #[test]
    fn test_structural_features_are_time_major() {
        // Lag-matrix rows index lag, columns index time. One active cell at
        // lag 2, time 0 must surface in the output at row 0 (time), col 2
        // (lag).
        let mut lag = Array2::<f32>::zeros((8, 8));
        lag[[2, 0]] = 1.0;
        let sf = structural_features(&lag, 2);
        let mut best = (0, 0);
        let mut best_v = f32::NEG_INFINITY;
        for i in 0..8 {
            for j in 0..8 {
                if sf[[i, j]] > best_v {
                    best_v = sf[[i, j]];
                    best = (i, j);
                }
            }
        }
        assert_eq!(best, (0, 2), "output rows are time, columns are lag");
    }
}
