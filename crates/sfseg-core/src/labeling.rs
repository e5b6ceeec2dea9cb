//! Segment labeling via transitive affinity
//!
//! Two segments are similar when the recurrence submatrix between them
//! carries a heavy monotone alignment path. Thresholded pairwise scores are
//! propagated with matrix powers until the "linked" relation stabilizes,
//! then connected components of the symmetrized relation become labels.
//!
//! Scores and powers run in f64; a hundred matrix powers of f32 scores
//! overflow long before convergence.

use ndarray::{s, Array2, ArrayView2};

/// Maximum-weight monotone alignment path sum through a score submatrix.
///
/// `Q[a][b] = max(Q[a-1][b-1], Q[a-1][b], Q[a][b-1]) + R[a][b]`, with the
/// maximum over all of `Q` read off at the end.
fn alignment_score(r: &ArrayView2<f32>) -> f64 {
    let (rows, cols) = r.dim();
    let mut prev = vec![0.0f64; cols + 1];
    let mut cur = vec![0.0f64; cols + 1];
    let mut best = 0.0f64;
    for a in 0..rows {
        cur[0] = 0.0;
        for b in 0..cols {
            let q = prev[b].max(prev[b + 1]).max(cur[b]) + f64::from(r[[a, b]]);
            cur[b + 1] = q;
            if q > best {
                best = q;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Assign a structural label to each segment between consecutive boundaries.
///
/// `boundaries` is in frame coordinates while `r` is indexed by embedded
/// rows, so segment slices are clamped to the matrix extent; the trailing
/// frames lost to embedding only shorten the final segment's slice.
pub fn label(boundaries: &[usize], r: &Array2<f32>, max_iter: usize) -> Vec<usize> {
    let n_seg = boundaries.len().saturating_sub(1);
    if n_seg == 0 {
        return Vec::new();
    }
    if n_seg == 1 {
        return vec![0];
    }

    let n = r.nrows();
    let mut sim = Array2::<f64>::zeros((n_seg, n_seg));
    for i in 0..n_seg {
        let (i_st, i_ed) = (boundaries[i].min(n), boundaries[i + 1].min(n));
        let len_i = boundaries[i + 1] - boundaries[i];
        for j in 0..n_seg {
            let (j_st, j_ed) = (boundaries[j].min(n), boundaries[j + 1].min(n));
            let len_j = boundaries[j + 1] - boundaries[j];
            let min_len = len_i.min(len_j);
            if min_len == 0 || i_st >= i_ed || j_st >= j_ed {
                continue;
            }
            let score = alignment_score(&r.slice(s![i_st..i_ed, j_st..j_ed]));
            sim[[i, j]] = score / min_len as f64;
        }
    }

    // Keep only scores above one population standard deviation over the mean
    let count = (n_seg * n_seg) as f64;
    let mean = sim.sum() / count;
    let var = sim.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;
    let thr = mean + var.sqrt();
    sim.mapv_inplace(|v| if v <= thr { 0.0 } else { v });

    // Matrix powers approximate the transitive closure of "strongly linked".
    // Iteration stops once the boolean relation reaches a fixed point;
    // entries are clamped so runaway powers cannot reach infinity first.
    let mut powered = sim.clone();
    let mut linked = powered.mapv(|v| v > 1.0);
    for _ in 0..max_iter {
        powered = powered.dot(&sim);
        powered.mapv_inplace(|v| v.min(1e12));
        let next = powered.mapv(|v| v > 1.0);
        if next == linked {
            break;
        }
        linked = next;
    }

    // Flood fill over the symmetrized relation; label ids are contiguous in
    // order of first assignment.
    let mut labels = vec![usize::MAX; n_seg];
    let mut next_label = 0;
    let mut queue = Vec::new();
    for i in 0..n_seg {
        if labels[i] != usize::MAX {
            continue;
        }
        labels[i] = next_label;
        queue.push(i);
        while let Some(a) = queue.pop() {
            for b in 0..n_seg {
                if labels[b] == usize::MAX && (linked[[a, b]] || linked[[b, a]]) {
                    labels[b] = next_label;
                    queue.push(b);
                }
            }
        }
        next_label += 1;
    }
    labels
}
