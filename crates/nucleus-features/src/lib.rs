//! Syllable Nucleus Feature Engine
//!
//! Computes a fixed six-slot acoustic feature vector from an isolated speech
//! segment: peak-to-peak amplitude, mean and max short-time energy, duration,
//! and max and mean autocorrelation pitch.
//!
//! Every function is pure over its inputs. The default entry points follow a
//! best-effort numeric contract and never fail; the `try_*` variants validate
//! their input first.

pub mod config;
pub mod energy;
pub mod error;
pub mod features;
pub mod framing;
pub mod mfcc;
pub mod pitch;
pub mod statistics;

pub use config::{FeatureConfig, PitchConfig};
pub use energy::{energy, frame_energies};
pub use error::FeatureError;
pub use features::{
    analyze_frames, extract_features, try_extract_features, FeatureExtractor, FeatureVector,
    FrameAnalysis, FEATURE_DIMENSION, FEATURE_NAMES,
};
pub use framing::{frame, frame_with_window, try_frame, Frames};
pub use mfcc::{extract_features_with_cepstrum, CepstralExtractor, CepstralFeatures};
pub use pitch::{estimate_pitch, pitch_estimate, zero_crossings, PitchEstimate, ZeroCrossings};
