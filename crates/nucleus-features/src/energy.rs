//! Short-Time Energy

use crate::framing::Frames;

/// Mean squared amplitude of a frame
///
/// An empty frame yields NaN.
pub fn energy(frame: &[f64]) -> f64 {
    frame.iter().map(|&x| x * x).sum::<f64>() / frame.len() as f64
}

/// Energy of every frame, index-aligned with the frames
pub fn frame_energies(frames: &Frames) -> Vec<f64> {
    frames.iter().map(energy).collect()
}
