//! Feature Extraction Error Types

use thiserror::Error;

/// Errors reported by the validating entry points
///
/// The permissive pipeline never fails; these only come out of the `try_*`
/// functions and the cepstral collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Signal has no samples
    #[error("Signal is empty")]
    EmptySignal,

    /// Sample rate of zero
    #[error("Sample rate must be positive")]
    ZeroSampleRate,

    /// NaN or infinite sample
    #[error("Sample {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: f64 },

    /// Frame length does not round to a positive sample count
    #[error("Frame length {0} does not round to a positive number of samples")]
    InvalidFrameLength(f64),

    /// Frame step does not round to a positive sample count
    #[error("Frame step {0} does not round to a positive number of samples")]
    InvalidFrameStep(f64),

    /// Unusable configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure inside the cepstral collaborator
    #[error("Cepstral extraction failed: {0}")]
    CepstralExtraction(String),
}
