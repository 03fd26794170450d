//! Feature Vector Assembly

use crate::config::FeatureConfig;
use crate::energy::frame_energies;
use crate::error::FeatureError;
use crate::framing::{frame, try_frame, Frames};
use crate::pitch::{frame_pitches, PitchEstimate};
use crate::statistics::{duration, SequenceStats};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 6;

/// Slot names in vector order
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "peak_to_peak",
    "mean_energy",
    "max_energy",
    "duration_s",
    "max_pitch_hz",
    "mean_pitch_hz",
];

/// Feature vector of one syllable nucleus, in classifier slot order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// `max(signal) - min(signal)` over the unframed signal
    pub peak_to_peak: f64,
    /// Mean of the per-frame energies
    pub mean_energy: f64,
    /// Max of the per-frame energies
    pub max_energy: f64,
    /// Signal length in seconds
    pub duration_s: f64,
    /// Max per-frame F0, unvoiced frames included as 0.0
    pub max_pitch_hz: f64,
    /// Mean per-frame F0, unvoiced frames included as 0.0
    pub mean_pitch_hz: f64,
}

impl FeatureVector {
    /// Slots in order
    pub fn as_array(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.peak_to_peak,
            self.mean_energy,
            self.max_energy,
            self.duration_s,
            self.max_pitch_hz,
            self.mean_pitch_hz,
        ]
    }

    /// Slots in order, as an owned vector
    pub fn to_vec(&self) -> Vec<f64> {
        self.as_array().to_vec()
    }

    /// Whether every slot is a finite number
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

impl From<FeatureVector> for [f64; FEATURE_DIMENSION] {
    fn from(features: FeatureVector) -> Self {
        features.as_array()
    }
}

/// Per-frame sequences computed on the way to a feature vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysis {
    /// Samples per frame after rounding
    pub frame_length: usize,
    /// Samples between frame starts after rounding
    pub frame_step: usize,
    /// Mean squared amplitude per frame
    pub energy: Vec<f64>,
    /// Harmonicity and F0 per frame
    pub pitch: Vec<PitchEstimate>,
}

impl FrameAnalysis {
    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.energy.len()
    }

    /// F0 per frame
    pub fn f0_track(&self) -> Vec<f64> {
        self.pitch.iter().map(|p| p.f0_hz).collect()
    }

    /// Number of frames with a surviving pitch estimate
    pub fn voiced_frames(&self) -> usize {
        self.pitch.iter().filter(|p| p.is_voiced()).count()
    }
}

/// Feature extractor with an explicit policy table
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Create a feature extractor after validating the configuration
    pub fn try_new(config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    fn analyze_frames(&self, frames: &Frames, sample_rate: u32) -> FrameAnalysis {
        FrameAnalysis {
            frame_length: frames.frame_length(),
            frame_step: frames.frame_step(),
            energy: frame_energies(frames),
            pitch: frame_pitches(frames, sample_rate, &self.config.pitch),
        }
    }

    /// Per-frame energy and pitch sequences
    pub fn analyze(&self, signal: &[f64], sample_rate: u32) -> FrameAnalysis {
        let frames = frame(
            signal,
            self.config.frame_length(sample_rate),
            self.config.frame_step(sample_rate),
        );
        self.analyze_frames(&frames, sample_rate)
    }

    fn assemble(&self, signal: &[f64], sample_rate: u32, analysis: &FrameAnalysis) -> FeatureVector {
        let energy = SequenceStats::compute(&analysis.energy);
        let pitch = SequenceStats::compute(&analysis.f0_track());

        let features = FeatureVector {
            peak_to_peak: SequenceStats::compute(signal).peak_to_peak(),
            mean_energy: energy.mean,
            max_energy: energy.max,
            duration_s: duration(signal.len(), sample_rate),
            max_pitch_hz: pitch.max,
            mean_pitch_hz: pitch.mean,
        };

        debug!(
            "Extracted features: frames={}, voiced={}, duration={:.3}s, max_pitch={:.1}Hz",
            analysis.frame_count(),
            analysis.voiced_frames(),
            features.duration_s,
            features.max_pitch_hz
        );

        features
    }

    /// Extract the feature vector, propagating NaN/Inf for degenerate input
    pub fn extract(&self, signal: &[f64], sample_rate: u32) -> FeatureVector {
        let analysis = self.analyze(signal, sample_rate);
        self.assemble(signal, sample_rate, &analysis)
    }

    /// Extract the feature vector after rejecting degenerate input
    pub fn try_extract(&self, signal: &[f64], sample_rate: u32) -> Result<FeatureVector, FeatureError> {
        validate_signal(signal, sample_rate)?;
        let frames = try_frame(
            signal,
            self.config.frame_length(sample_rate),
            self.config.frame_step(sample_rate),
        )?;
        let analysis = self.analyze_frames(&frames, sample_rate);
        Ok(self.assemble(signal, sample_rate, &analysis))
    }
}

/// Reject empty signals, a zero sample rate and non-finite samples
pub fn validate_signal(signal: &[f64], sample_rate: u32) -> Result<(), FeatureError> {
    if signal.is_empty() {
        return Err(FeatureError::EmptySignal);
    }
    if sample_rate == 0 {
        return Err(FeatureError::ZeroSampleRate);
    }
    if let Some((index, &value)) = signal.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(FeatureError::NonFiniteSample { index, value });
    }
    Ok(())
}

/// Per-frame energy and pitch with the default policy table
pub fn analyze_frames(signal: &[f64], sample_rate: u32) -> FrameAnalysis {
    FeatureExtractor::default().analyze(signal, sample_rate)
}

/// Feature vector with the default policy table
///
/// Degenerate input is not validated: an empty signal yields a NaN
/// peak-to-peak and a zero sample rate yields NaN energies and an infinite
/// duration. See [`try_extract_features`] for the validating variant.
pub fn extract_features(signal: &[f64], sample_rate: u32) -> FeatureVector {
    FeatureExtractor::default().extract(signal, sample_rate)
}

/// Validating variant of [`extract_features`]
pub fn try_extract_features(signal: &[f64], sample_rate: u32) -> Result<FeatureVector, FeatureError> {
    FeatureExtractor::default().try_extract(signal, sample_rate)
}
