//! Extraction Policy Table

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};

/// Additive guard against division by zero in normalization
pub const EPS: f64 = 1e-8;

/// Analysis window length (seconds)
pub const WIN_LENGTH_S: f64 = 0.025;

/// Analysis window step (seconds)
pub const WIN_STEP_S: f64 = 0.01;

/// Longest admissible pitch period (seconds)
pub const MAX_PERIOD_S: f64 = 0.016;

/// Frames whose correlation curve crosses zero more often than this are unvoiced
pub const ZCR_GATE: f64 = 0.15;

/// Pitch estimates above this are treated as spurious (Hz)
pub const F0_MAX_HZ: f64 = 5000.0;

/// Minimum harmonicity ratio for a pitch estimate to be kept
pub const HR_MIN: f64 = 0.1;

/// Number of mel-cepstral coefficients requested from the cepstral collaborator
pub const DEFAULT_CEPSTRAL_COEFFICIENTS: usize = 27;

/// Thresholds for the autocorrelation pitch estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Normalization epsilon
    pub eps: f64,
    /// Longest admissible pitch period (seconds)
    pub max_period_s: f64,
    /// Zero-crossing-rate gate on the normalized correlation curve
    pub zcr_gate: f64,
    /// Upper bound on accepted F0 (Hz)
    pub f0_max_hz: f64,
    /// Lower bound on accepted harmonicity
    pub hr_min: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            eps: EPS,
            max_period_s: MAX_PERIOD_S,
            zcr_gate: ZCR_GATE,
            f0_max_hz: F0_MAX_HZ,
            hr_min: HR_MIN,
        }
    }
}

/// Full configuration for the feature pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Frame length (seconds)
    pub win_length_s: f64,
    /// Frame step (seconds)
    pub win_step_s: f64,
    /// Pitch estimator thresholds
    pub pitch: PitchConfig,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            win_length_s: WIN_LENGTH_S,
            win_step_s: WIN_STEP_S,
            pitch: PitchConfig::default(),
        }
    }
}

impl FeatureConfig {
    /// Frame length in (unrounded) samples for a sample rate
    pub fn frame_length(&self, sample_rate: u32) -> f64 {
        self.win_length_s * f64::from(sample_rate)
    }

    /// Frame step in (unrounded) samples for a sample rate
    pub fn frame_step(&self, sample_rate: u32) -> f64 {
        self.win_step_s * f64::from(sample_rate)
    }

    /// Check that every entry is usable
    pub fn validate(&self) -> Result<(), FeatureError> {
        let positive = [
            ("win_length_s", self.win_length_s),
            ("win_step_s", self.win_step_s),
            ("pitch.max_period_s", self.pitch.max_period_s),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FeatureError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("pitch.eps", self.pitch.eps),
            ("pitch.zcr_gate", self.pitch.zcr_gate),
            ("pitch.f0_max_hz", self.pitch.f0_max_hz),
            ("pitch.hr_min", self.pitch.hr_min),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(FeatureError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}
