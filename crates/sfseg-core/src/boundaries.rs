//! Boundary finalizing
//!
//! Peaks are picked in embedded-row coordinates; each embedded row stands
//! for a window of `m` original frames, so peaks shift by half the window
//! before they become frame boundaries.

use std::collections::BTreeSet;

use crate::error::{Result, SegmenterError};

/// Convert raw novelty peaks into a sorted boundary list over `t` frames.
///
/// Peaks shift right by `ceil(m / 2)`; shifted peaks falling on or outside
/// the track endpoints are dropped, and the endpoints `0` and `t - 1` are
/// always included.
pub fn finalize(raw_peaks: &[usize], m: usize, t: usize) -> Result<Vec<usize>> {
    if t == 0 {
        return Err(SegmenterError::BoundaryAlignment {
            reason: "empty feature matrix".to_string(),
        });
    }
    if t == 1 {
        return Ok(vec![0]);
    }

    let shift = m.div_ceil(2);
    let mut set = BTreeSet::new();
    set.insert(0);
    set.insert(t - 1);
    for &p in raw_peaks {
        let b = p + shift;
        if b > 0 && b < t - 1 {
            set.insert(b);
        }
    }

    let boundaries: Vec<usize> = set.into_iter().collect();
    match (boundaries.first(), boundaries.last()) {
        (Some(0), Some(&last)) if last == t - 1 => Ok(boundaries),
        _ => Err(SegmenterError::BoundaryAlignment {
            reason: format!("boundaries do not span 0..{}", t - 1),
        }),
    }
}
