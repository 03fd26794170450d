//! Sequence Reductions

/// Summary of a numeric sequence
///
/// NaN anywhere in the input propagates to every field, and an empty
/// sequence summarizes to NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl SequenceStats {
    /// Compute the summary of a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
            };
        }

        let n = values.len() as f64;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &v in values {
            sum += v;
            if v.is_nan() {
                min = f64::NAN;
                max = f64::NAN;
            } else if !min.is_nan() {
                min = min.min(v);
                max = max.max(v);
            }
        }

        Self {
            mean: sum / n,
            min,
            max,
        }
    }

    /// Distance between the extremes
    pub fn peak_to_peak(&self) -> f64 {
        self.max - self.min
    }
}

/// Mean of a sequence
pub fn mean(values: &[f64]) -> f64 {
    SequenceStats::compute(values).mean
}

/// Maximum of a sequence
pub fn max(values: &[f64]) -> f64 {
    SequenceStats::compute(values).max
}

/// `max - min` of a sequence
pub fn peak_to_peak(values: &[f64]) -> f64 {
    SequenceStats::compute(values).peak_to_peak()
}

/// Duration in seconds of `samples` samples at `sample_rate`
pub fn duration(samples: usize, sample_rate: u32) -> f64 {
    samples as f64 / f64::from(sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((mean(&values) - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_extremes() {
        let stats = SequenceStats::compute(&[0.5, -0.25, 0.75, 0.0]);
        assert_eq!(stats.min, -0.25);
        assert_eq!(stats.max, 0.75);
        assert_eq!(stats.peak_to_peak(), 1.0);
    }

    #[test]
    fn test_nan_propagates() {
        let values = [1.0, f64::NAN, 3.0];
        assert!(mean(&values).is_nan());
        assert!(max(&values).is_nan());
        assert!(peak_to_peak(&values).is_nan());
    }

    #[test]
    fn test_empty_values() {
        assert!(mean(&[]).is_nan());
        assert!(peak_to_peak(&[]).is_nan());
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(16_000, 16_000), 1.0);
        assert_eq!(duration(400, 16_000), 0.025);
        assert!(duration(10, 0).is_infinite());
        assert!(duration(0, 0).is_nan());
    }
}
