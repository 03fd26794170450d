//! Cepstral Collaborator
//!
//! Mel-cepstral coefficients come from outside this crate. The aggregator
//! only appends whatever the collaborator returns after the six core slots.

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::features::{FeatureExtractor, FeatureVector, FEATURE_DIMENSION};

/// Source of mel-cepstral coefficients for a whole signal
pub trait CepstralExtractor {
    /// Compute `coefficients` mel-cepstral coefficients for `signal`
    fn cepstral_coefficients(
        &self,
        signal: &[f64],
        sample_rate: u32,
        coefficients: usize,
    ) -> Result<Vec<f64>, FeatureError>;
}

impl<F> CepstralExtractor for F
where
    F: Fn(&[f64], u32, usize) -> Result<Vec<f64>, FeatureError>,
{
    fn cepstral_coefficients(
        &self,
        signal: &[f64],
        sample_rate: u32,
        coefficients: usize,
    ) -> Result<Vec<f64>, FeatureError> {
        self(signal, sample_rate, coefficients)
    }
}

/// Core features followed by cepstral coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct CepstralFeatures {
    /// The six core slots
    pub core: FeatureVector,
    /// Coefficients as returned by the collaborator
    pub cepstrum: Vec<f64>,
}

impl CepstralFeatures {
    /// Flattened vector: core slots, then coefficients
    pub fn to_vec(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(FEATURE_DIMENSION + self.cepstrum.len());
        values.extend_from_slice(&self.core.as_array());
        values.extend_from_slice(&self.cepstrum);
        values
    }
}

impl FeatureExtractor {
    /// Core features plus `coefficients` cepstral coefficients
    pub fn extract_with_cepstrum<C>(
        &self,
        signal: &[f64],
        sample_rate: u32,
        extractor: &C,
        coefficients: usize,
    ) -> Result<CepstralFeatures, FeatureError>
    where
        C: CepstralExtractor + ?Sized,
    {
        let core = self.extract(signal, sample_rate);
        let cepstrum = extractor.cepstral_coefficients(signal, sample_rate, coefficients)?;
        Ok(CepstralFeatures { core, cepstrum })
    }
}

/// Core features plus cepstral coefficients with the default policy table
pub fn extract_features_with_cepstrum<C>(
    signal: &[f64],
    sample_rate: u32,
    extractor: &C,
    coefficients: usize,
) -> Result<CepstralFeatures, FeatureError>
where
    C: CepstralExtractor + ?Sized,
{
    FeatureExtractor::new(FeatureConfig::default()).extract_with_cepstrum(
        signal,
        sample_rate,
        extractor,
        coefficients,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CEPSTRAL_COEFFICIENTS;
    use crate::features::extract_features;

    struct Constant(f64);

    impl CepstralExtractor for Constant {
        fn cepstral_coefficients(
            &self,
            _signal: &[f64],
            _sample_rate: u32,
            coefficients: usize,
        ) -> Result<Vec<f64>, FeatureError> {
            Ok(vec![self.0; coefficients])
        }
    }

    #[test]
    fn test_coefficients_follow_core_slots() {
        let signal = [0.25, -0.25, 0.5];
        let features = extract_features_with_cepstrum(
            &signal,
            16_000,
            &Constant(7.0),
            DEFAULT_CEPSTRAL_COEFFICIENTS,
        )
        .unwrap();

        let values = features.to_vec();
        assert_eq!(values.len(), FEATURE_DIMENSION + 27);
        assert_eq!(&values[..FEATURE_DIMENSION], &extract_features(&signal, 16_000).as_array());
        assert!(values[FEATURE_DIMENSION..].iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_closure_collaborator_receives_arguments() {
        let collaborator = |signal: &[f64], rate: u32, n: usize| -> Result<Vec<f64>, FeatureError> {
            Ok(vec![signal.len() as f64, f64::from(rate), n as f64])
        };
        let features = extract_features_with_cepstrum(&[0.0; 10], 8_000, &collaborator, 13).unwrap();
        assert_eq!(features.cepstrum, vec![10.0, 8_000.0, 13.0]);
    }

    #[test]
    fn test_collaborator_error_propagates() {
        let failing = |_: &[f64], _: u32, _: usize| -> Result<Vec<f64>, FeatureError> {
            Err(FeatureError::CepstralExtraction("filterbank unavailable".into()))
        };
        let result = extract_features_with_cepstrum(&[0.1], 16_000, &failing, 27);
        assert_eq!(
            result,
            Err(FeatureError::CepstralExtraction("filterbank unavailable".into()))
        );
    }
}
