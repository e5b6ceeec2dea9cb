use super::*;
use crate::config::{NormPolicy, SegmenterConfig};
use ndarray::Array2;

fn wavy_features(t: usize, d: usize) -> Array2<f32> {
    Array2::from_shape_fn((t, d), |(i, j)| {
        ((i as f32) * 0.23 + (j as f32) * 0.9).sin() + ((i as f32) * 0.05).cos()
    })
}

/// Three-section track: four frames of pattern A, four of B, four of A.
fn aba_features() -> Array2<f32> {
    let mut x = Array2::zeros((12, 2));
    for i in 0..12 {
        if (4..8).contains(&i) {
            x[[i, 1]] = 1.0;
        } else {
            x[[i, 0]] = 1.0;
        }
    }
    x
}

fn aba_config() -> SegmenterConfig {
    SegmenterConfig {
        embedding_dimension: 2,
        neighbor_fraction: 0.3,
        gaussian_kernel_size: 4,
        peak_window_size: 4,
        short_track_threshold: 8,
        ..Default::default()
    }
}

fn segment_of(boundaries: &[usize], frame: usize) -> usize {
    boundaries
        .windows(2)
        .position(|w| (w[0]..w[1]).contains(&frame))
        .unwrap_or(boundaries.len() - 2)
}

#[test]
fn test_boundary_invariant_holds() {
    let features = wavy_features(120, 6);
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let result = segmenter.segment(&features, false).unwrap();

    assert_eq!(result.boundaries[0], 0);
    assert_eq!(*result.boundaries.last().unwrap(), 119);
    for w in result.boundaries.windows(2) {
        assert!(w[0] < w[1], "boundaries must be strictly increasing");
    }
    assert!(result.labels.is_none());
}

#[test]
fn test_labels_partition_the_segments() {
    let features = wavy_features(120, 6);
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let result = segmenter.segment(&features, true).unwrap();

    let labels = result.labels.unwrap();
    assert_eq!(labels.len(), result.boundaries.len() - 1);
    let max = labels.iter().max().copied().unwrap_or(0);
    for l in 0..=max {
        assert!(labels.contains(&l), "label ids must be contiguous");
    }
}

#[test]
fn test_short_track_returns_endpoints() {
    let features = wavy_features(10, 3);
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let result = segmenter.segment(&features, true).unwrap();

    assert_eq!(result.boundaries, vec![0, 9]);
    assert_eq!(result.labels, Some(vec![0]));
}

#[test]
fn test_single_frame_track() {
    let features = wavy_features(1, 3);
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let result = segmenter.segment(&features, true).unwrap();

    assert_eq!(result.boundaries, vec![0]);
    assert_eq!(result.labels, Some(Vec::new()));
}

#[test]
fn test_aba_track_finds_both_transitions() {
    let segmenter = Segmenter::new(aba_config()).unwrap();
    let result = segmenter.segment(&aba_features(), false).unwrap();

    let interior: Vec<usize> = result.boundaries[1..result.boundaries.len() - 1].to_vec();
    assert!(!interior.is_empty(), "expected interior boundaries");
    for &b in &interior {
        assert!(
            (3..=5).contains(&b) || (7..=9).contains(&b),
            "boundary {b} far from either transition"
        );
    }
    assert!(interior.iter().any(|b| (3..=5).contains(b)));
    assert!(interior.iter().any(|b| (7..=9).contains(b)));
}

#[test]
fn test_aba_track_labels_repeated_section() {
    let segmenter = Segmenter::new(aba_config()).unwrap();
    let result = segmenter.segment(&aba_features(), true).unwrap();

    let labels = result.labels.unwrap();
    assert!(labels.len() >= 3);
    let first_a = segment_of(&result.boundaries, 1);
    let middle_b = segment_of(&result.boundaries, 6);
    let last_a = segment_of(&result.boundaries, 10);
    assert_eq!(labels[first_a], labels[last_a]);
    assert_ne!(labels[first_a], labels[middle_b]);
}

#[test]
fn test_all_zero_track_has_no_spurious_boundaries() {
    let features = Array2::<f32>::zeros((50, 4));
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let result = segmenter.segment(&features, false).unwrap();

    assert_eq!(result.boundaries, vec![0, 49]);
}

#[test]
fn test_track_shorter_than_embedding_errors() {
    // Long enough to pass the short-track gate, too short to embed
    let features = wavy_features(25, 4);
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let err = segmenter.segment(&features, false).unwrap_err();

    assert!(matches!(
        err,
        SegmenterError::InsufficientLength {
            frames: 25,
            required: 30
        }
    ));
}

#[test]
fn test_empty_track_errors() {
    let features = Array2::<f32>::zeros((0, 4));
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    assert!(segmenter.segment(&features, false).is_err());
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = SegmenterConfig {
        neighbor_fraction: 2.0,
        ..Default::default()
    };
    assert!(Segmenter::new(config).is_err());
}

#[test]
fn test_trace_captures_intermediates() {
    let segmenter = Segmenter::new(aba_config()).unwrap();
    let (result, trace) = segmenter.segment_with_trace(&aba_features(), false).unwrap();
    let trace = trace.unwrap();

    // 12 frames embedded pairwise leave 11 rows of width 4
    assert_eq!(trace.embedded.dim(), (11, 4));
    assert_eq!(trace.recurrence.dim(), (11, 11));
    assert_eq!(trace.lag.dim(), (11, 11));
    assert_eq!(trace.structural.dim(), (11, 11));
    assert_eq!(trace.novelty.len(), 11);
    assert!(!trace.raw_peaks.is_empty());
    assert!(result.boundaries.len() >= trace.raw_peaks.len());
}

#[test]
fn test_trace_is_absent_on_trivial_paths() {
    let segmenter = Segmenter::new(aba_config()).unwrap();

    let short = wavy_features(6, 2);
    let (result, trace) = segmenter.segment_with_trace(&short, false).unwrap();
    assert_eq!(result.boundaries, vec![0, 5]);
    assert!(trace.is_none());

    let flat = Array2::<f32>::ones((30, 2));
    let (result, trace) = segmenter.segment_with_trace(&flat, false).unwrap();
    assert_eq!(result.boundaries, vec![0, 29]);
    assert!(trace.is_none());
}

#[test]
fn test_min_max_policy_runs_end_to_end() {
    let config = SegmenterConfig {
        normalization: NormPolicy::MinMax,
        ..Default::default()
    };
    let features = wavy_features(120, 6);
    let segmenter = Segmenter::new(config).unwrap();
    let result = segmenter.segment(&features, false).unwrap();
    assert_eq!(result.boundaries[0], 0);
    assert_eq!(*result.boundaries.last().unwrap(), 119);
}
