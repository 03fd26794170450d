//! Signal Framing and Analysis Windows

use crate::error::FeatureError;

/// Rectangular (all-ones) window, the framing default
pub fn rectangular(length: usize) -> Vec<f64> {
    vec![1.0; length]
}

/// Hamming window to reduce spectral leakage
pub fn hamming(length: usize) -> Vec<f64> {
    raised_cosine(length, 0.54, 0.46)
}

/// Hann window
pub fn hann(length: usize) -> Vec<f64> {
    raised_cosine(length, 0.5, 0.5)
}

fn raised_cosine(length: usize, a0: f64, a1: f64) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }
    let denom = (length - 1) as f64;
    (0..length)
        .map(|i| a0 - a1 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos())
        .collect()
}

/// Round a length in samples half-to-even, saturating at zero
fn round_samples(value: f64) -> usize {
    let rounded = value.round_ties_even();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as usize
    }
}

/// Number of frames needed to cover `signal_len` samples
///
/// A signal no longer than one frame always yields a single frame.
pub fn frame_count(signal_len: usize, frame_length: usize, frame_step: usize) -> usize {
    if signal_len <= frame_length {
        1
    } else {
        1 + (signal_len - frame_length).div_ceil(frame_step.max(1))
    }
}

/// Overlapping, zero-padded frames of a signal, stored contiguously
#[derive(Debug, Clone, PartialEq)]
pub struct Frames {
    data: Vec<f64>,
    frame_length: usize,
    frame_step: usize,
    count: usize,
}

impl Frames {
    /// Samples per frame
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// Samples between consecutive frame starts
    pub fn frame_step(&self) -> usize {
        self.frame_step
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when there are no frames, which framing never produces
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Frame at `index`, if any
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        (index < self.count)
            .then(|| &self.data[index * self.frame_length..(index + 1) * self.frame_length])
    }

    /// Frames in signal order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.count)
            .map(move |i| &self.data[i * self.frame_length..(i + 1) * self.frame_length])
    }
}

/// Split a signal into frames with the rectangular window
///
/// `frame_length` and `frame_step` are in samples and rounded half-to-even.
/// Callers must pass values that round to positive integers; a step that rounds
/// to zero is raised to one sample and a length that rounds to zero or below
/// produces empty frames. Use [`try_frame`] to reject such input instead.
pub fn frame(signal: &[f64], frame_length: f64, frame_step: f64) -> Frames {
    frame_with_window(signal, frame_length, frame_step, rectangular)
}

/// Split a signal into frames, weighting each by `window(frame_length)`
pub fn frame_with_window<W>(
    signal: &[f64],
    frame_length: f64,
    frame_step: f64,
    window: W,
) -> Frames
where
    W: Fn(usize) -> Vec<f64>,
{
    let frame_length = round_samples(frame_length);
    let frame_step = round_samples(frame_step).max(1);
    let count = frame_count(signal.len(), frame_length, frame_step);
    let weights = window(frame_length);
    debug_assert_eq!(weights.len(), frame_length);

    let mut data = Vec::with_capacity(count * frame_length);
    for i in 0..count {
        let start = i * frame_step;
        for (offset, &w) in weights.iter().enumerate() {
            let sample = signal.get(start + offset).copied().unwrap_or(0.0);
            data.push(sample * w);
        }
    }

    Frames {
        data,
        frame_length,
        frame_step,
        count,
    }
}

/// Validating variant of [`frame`]
pub fn try_frame(signal: &[f64], frame_length: f64, frame_step: f64) -> Result<Frames, FeatureError> {
    if round_samples(frame_length) == 0 {
        return Err(FeatureError::InvalidFrameLength(frame_length));
    }
    if round_samples(frame_step) == 0 {
        return Err(FeatureError::InvalidFrameStep(frame_step));
    }
    Ok(frame(signal, frame_length, frame_step))
}
