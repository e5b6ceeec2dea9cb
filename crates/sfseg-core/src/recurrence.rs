//! k-nearest-neighbor recurrence matrix and its circular lag transform

use ndarray::Array2;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};

/// Build a binary recurrence matrix over the embedded rows.
///
/// `R[i][j]` is 1 when row `j` is among the `k` nearest rows to row `i` by
/// Euclidean distance, with `k` taken as `neighbor_fraction` of the row
/// count, rounded and clamped to `1 ..= N - 1`. A row's own zero distance
/// makes it its nearest neighbor, so the diagonal is set unless exact
/// duplicates of the row crowd it out.
///
/// Rows that are exact duplicates produce tied distances straddling the
/// `k` cutoff. Tied candidates are taken lowest in-degree first, preferring
/// the temporally more distant row among equals; collapsing such ties onto
/// the lowest indices would leave later copies of a repeated section with
/// no incoming links and hide the repetition from the lag analysis.
pub fn build(e: &Array2<f32>, neighbor_fraction: f32) -> Array2<f32> {
    let n = e.nrows();
    if n < 2 {
        return Array2::zeros((n, n));
    }
    let k_val = ((neighbor_fraction * n as f32).round() as usize).clamp(1, n - 1);

    // Distances in parallel; neighbor selection stays sequential so tied
    // picks can balance in-degree across rows.
    let dist_rows: Vec<Vec<f32>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let ri = e.row(i);
            (0..n)
                .map(|j| {
                    let rj = e.row(j);
                    ri.iter()
                        .zip(rj.iter())
                        .map(|(a, b)| {
                            let d = a - b;
                            d * d
                        })
                        .sum::<f32>()
                })
                .collect()
        })
        .collect();

    let mut r = Array2::zeros((n, n));
    let mut in_degree = vec![0usize; n];
    for (i, dists) in dist_rows.iter().enumerate() {
        let mut sorted = dists.clone();
        sorted.select_nth_unstable_by(k_val - 1, |a, b| {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        });
        let cutoff = sorted[k_val - 1];

        let mut taken = 0;
        let mut tied = Vec::new();
        for (j, &d) in dists.iter().enumerate() {
            if d < cutoff {
                r[[i, j]] = 1.0;
                in_degree[j] += 1;
                taken += 1;
            } else if d == cutoff {
                tied.push(j);
            }
        }
        tied.sort_by_key(|&j| (in_degree[j], Reverse(i.abs_diff(j)), j));
        for &j in tied.iter().take(k_val - taken) {
            r[[i, j]] = 1.0;
            in_degree[j] += 1;
        }
    }
    r
}

/// Circular time-lag transform: `L[i][j] = R[(i + j) mod N][j]`.
///
/// Repetition of a section shows up in `R` as a diagonal stripe; the lag
/// transform rotates each column so those stripes become horizontal and the
/// Gaussian smoothing that follows can operate along the time axis.
pub fn to_lag(r: &Array2<f32>) -> Array2<f32> {
    let n = r.nrows();
    let mut lag = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            lag[[i, j]] = r[[(i + j) % n, j]];
        }
    }
    lag
}
