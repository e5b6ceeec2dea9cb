//! Frame/time conversion helpers for host adapters

/// Convert frame indices to seconds given the analysis hop length.
pub fn frames_to_time(frames: &[usize], sample_rate: u32, hop_length: usize) -> Vec<f32> {
    frames
        .iter()
        .map(|&f| (f * hop_length) as f32 / sample_rate as f32)
        .collect()
}
