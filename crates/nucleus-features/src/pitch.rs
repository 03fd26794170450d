//! Autocorrelation Pitch Estimation
//!
//! Each frame's autocorrelation is normalized against the frame energy and a
//! reversed cumulative energy, restricted to lags between the first zero
//! crossing of the autocorrelation and the longest admissible period. The
//! zero-crossing rate of that normalized curve gates the frame: an oscillating
//! curve means there is no stable period to report.

use crate::config::PitchConfig;
use crate::framing::Frames;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Harmonicity and fundamental frequency of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchEstimate {
    /// Peak of the normalized autocorrelation in the admissible lag range
    pub harmonicity: f64,
    /// Fundamental frequency (Hz), 0.0 when unvoiced or rejected
    pub f0_hz: f64,
}

impl PitchEstimate {
    /// Estimate for a frame rejected by the zero-crossing gate
    pub const UNVOICED: Self = Self {
        harmonicity: 0.0,
        f0_hz: 0.0,
    };

    /// Whether a pitch survived the post-filters
    pub fn is_voiced(&self) -> bool {
        self.f0_hz > 0.0
    }
}

/// Sign changes of a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroCrossings {
    /// Crossings, where touching zero counts as half a crossing
    pub count: f64,
    /// `count / (len - 1)`
    pub rate: f64,
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        // keeps NaN, maps both zeros to 0.0
        value * 0.0
    }
}

/// Count sign changes in `values`
///
/// A one-element sequence has a NaN rate; an empty one has a rate of -0.0.
pub fn zero_crossings(values: &[f64]) -> ZeroCrossings {
    let count = values
        .windows(2)
        .map(|w| (sign(w[1]) - sign(w[0])).abs())
        .sum::<f64>()
        / 2.0;
    let rate = count / (values.len() as f64 - 1.0);
    ZeroCrossings { count, rate }
}

/// Autocorrelation at lags `1..len`; element `k` holds lag `k + 1`
fn one_sided_autocorrelation(frame: &[f64]) -> Vec<f64> {
    (1..frame.len())
        .map(|lag| {
            frame[..frame.len() - lag]
                .iter()
                .zip(&frame[lag..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}

fn first_sign_change(values: &[f64]) -> Option<usize> {
    values.windows(2).position(|w| sign(w[0]) != sign(w[1]))
}

/// First maximum and its index; NaN wins like an unordered maximum would
fn peak(values: &[f64]) -> (f64, usize) {
    let mut best = (values[0], 0);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if best.0.is_nan() {
            break;
        }
        if v > best.0 || v.is_nan() {
            best = (v, i);
        }
    }
    best
}

/// Pitch of one frame with the default thresholds
pub fn pitch_estimate(frame: &[f64], sample_rate: u32) -> PitchEstimate {
    estimate_pitch(frame, sample_rate, &PitchConfig::default())
}

/// Pitch of one frame
pub fn estimate_pitch(frame: &[f64], sample_rate: u32, config: &PitchConfig) -> PitchEstimate {
    let fs = f64::from(sample_rate);
    let energy: f64 = frame.iter().map(|&x| x * x).sum();
    let r = one_sided_autocorrelation(frame);
    let last = r.len() as isize - 1;

    let m0 = first_sign_change(&r).map_or(last, |i| i as isize);
    let max_lag = ((config.max_period_s * fs).round_ties_even() as isize - 1).min(last);
    let gamma_len = max_lag.max(0) as usize;

    let mut gamma = vec![0.0; gamma_len];
    if m0 < max_lag {
        let m0 = m0 as usize;
        let mut cumulative = Vec::with_capacity(frame.len());
        let mut running = 0.0;
        for &x in frame {
            running += x * x;
            cumulative.push(running);
        }
        for k in m0..gamma_len {
            let reversed = cumulative[gamma_len + m0 - k];
            gamma[k] = r[k] / ((energy * reversed).sqrt() + config.eps);
        }
    }

    let zcr = zero_crossings(&gamma);
    if zcr.rate > config.zcr_gate {
        trace!(rate = zcr.rate, "frame gated as unvoiced");
        return PitchEstimate::UNVOICED;
    }

    let (harmonicity, best_lag) = if gamma.is_empty() {
        (1.0, 0.0)
    } else {
        let (value, index) = peak(&gamma);
        (value, index as f64)
    };

    let mut f0_hz = fs / (best_lag + config.eps);
    if f0_hz > config.f0_max_hz || harmonicity < config.hr_min {
        f0_hz = 0.0;
    }

    PitchEstimate { harmonicity, f0_hz }
}

/// Pitch of every frame, index-aligned with the frames
pub fn frame_pitches(frames: &Frames, sample_rate: u32, config: &PitchConfig) -> Vec<PitchEstimate> {
    frames
        .iter()
        .map(|f| estimate_pitch(f, sample_rate, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sine(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                amplitude
                    * (2.0 * std::f64::consts::PI * freq * i as f64 / f64::from(sample_rate)).sin()
            })
            .collect()
    }

    #[test]
    fn test_zero_crossings_counts_half_steps_through_zero() {
        let zc = zero_crossings(&[1.0, -1.0, 1.0]);
        assert_eq!(zc.count, 2.0);
        assert_eq!(zc.rate, 1.0);

        let zc = zero_crossings(&[0.0, 0.0, 0.5, 0.2]);
        assert_eq!(zc.count, 0.5);

        let zc = zero_crossings(&[1.0, 0.0, -1.0]);
        assert_eq!(zc.count, 1.0);
    }

    #[test]
    fn test_zero_crossings_short_sequences() {
        assert!(zero_crossings(&[0.3]).rate.is_nan());
        let empty = zero_crossings(&[]);
        assert_eq!(empty.count, 0.0);
        assert!(empty.rate <= 0.0);
    }

    #[test]
    fn test_autocorrelation_lags() {
        let r = one_sided_autocorrelation(&[1.0, 2.0, 3.0]);
        // lag 1: 1*2 + 2*3, lag 2: 1*3
        assert_eq!(r, vec![8.0, 3.0]);
        assert!(one_sided_autocorrelation(&[1.0]).is_empty());
        assert!(one_sided_autocorrelation(&[]).is_empty());
    }

    #[test]
    fn test_peak_takes_first_maximum() {
        assert_eq!(peak(&[0.0, 0.7, 0.2, 0.7]), (0.7, 1));
    }

    #[test]
    fn test_silent_frame_is_unvoiced() {
        let estimate = pitch_estimate(&[0.0; 400], 16_000);
        assert_eq!(estimate, PitchEstimate::UNVOICED);
    }

    #[test]
    fn test_alternating_frame_is_gated() {
        let frame: Vec<f64> = (0..400).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert_eq!(pitch_estimate(&frame, 16_000), PitchEstimate::UNVOICED);
    }

    #[test]
    fn test_constant_frame_has_empty_search_range() {
        // No zero crossing in the autocorrelation, so the search range is empty
        let estimate = pitch_estimate(&[1.0; 400], 16_000);
        assert_eq!(estimate.harmonicity, 0.0);
        assert_eq!(estimate.f0_hz, 0.0);
    }

    #[test]
    fn test_tiny_frame_takes_degenerate_branch() {
        // 0.016 * 100 rounds to 2, so the lag bound collapses below one sample
        let estimate = pitch_estimate(&[0.3, 0.5], 100);
        assert_eq!(estimate.harmonicity, 1.0);
        assert_eq!(estimate.f0_hz, 0.0);

        assert_eq!(pitch_estimate(&[0.3], 100).harmonicity, 1.0);
        assert_eq!(pitch_estimate(&[], 100).harmonicity, 1.0);
    }

    #[test]
    fn test_sine_100hz() {
        let frame = sine(100.0, 1.0, 16_000, 400);
        let estimate = pitch_estimate(&frame, 16_000);
        assert!(estimate.is_voiced());
        assert!((estimate.f0_hz - 98.765).abs() < 0.01);
        assert!((estimate.harmonicity - 0.991).abs() < 0.01);
    }

    #[test]
    fn test_sine_150hz_lands_on_period_multiple() {
        let frame = sine(150.0, 1.0, 16_000, 400);
        let estimate = pitch_estimate(&frame, 16_000);
        // The reversed-energy normalization favours the second period here
        assert!((estimate.f0_hz - 75.117).abs() < 0.01);
        assert!(estimate.harmonicity > 1.0);
    }

    #[test]
    fn test_custom_thresholds() {
        let frame = sine(100.0, 1.0, 16_000, 400);
        let strict = PitchConfig {
            hr_min: 0.999,
            ..Default::default()
        };
        let estimate = estimate_pitch(&frame, 16_000, &strict);
        assert_eq!(estimate.f0_hz, 0.0);
        assert!(estimate.harmonicity > 0.9);

        let low_ceiling = PitchConfig {
            f0_max_hz: 50.0,
            ..Default::default()
        };
        assert_eq!(estimate_pitch(&frame, 16_000, &low_ceiling).f0_hz, 0.0);
    }

    proptest! {
        #[test]
        fn prop_pitch_is_deterministic(
            frame in prop::collection::vec(-1.0f64..1.0, 2..400),
            sample_rate in 8_000u32..48_000,
        ) {
            let a = pitch_estimate(&frame, sample_rate);
            let b = pitch_estimate(&frame, sample_rate);
            prop_assert_eq!(a.harmonicity.to_bits(), b.harmonicity.to_bits());
            prop_assert_eq!(a.f0_hz.to_bits(), b.f0_hz.to_bits());
        }

        #[test]
        fn prop_pitch_bounds(
            frame in prop::collection::vec(-1.0f64..1.0, 400),
            sample_rate in 8_000u32..48_000,
        ) {
            let estimate = pitch_estimate(&frame, sample_rate);
            prop_assert!(estimate.f0_hz == 0.0
                || (estimate.f0_hz > 0.0 && estimate.f0_hz <= 5000.0));
            prop_assert!(estimate.harmonicity.is_finite());
            prop_assert!(estimate.harmonicity >= 0.0);
            if estimate.is_voiced() {
                prop_assert!(estimate.harmonicity >= 0.1);
            }
        }
    }
}
