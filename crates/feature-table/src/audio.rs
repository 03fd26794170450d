//! WAV Loading

use crate::TableError;
use std::path::Path;

/// Mono samples decoded from a WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Samples averaged across channels
    pub samples: Vec<f64>,
    /// Sample rate (Hz)
    pub sample_rate: u32,
    /// Channel count of the source file
    pub channels: u16,
}

/// Average interleaved channels into one
fn downmix(interleaved: Vec<f64>, channels: u16) -> Vec<f64> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks(usize::from(channels))
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect()
}

/// Read a WAV file as mono samples
///
/// Integer samples keep their raw amplitude unless `normalize` scales them
/// into [-1, 1] by bit depth. Float samples are used as stored.
pub fn read_wav(path: &Path, normalize: bool) -> Result<Recording, TableError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map(f64::from))
            .collect::<Result<Vec<f64>, _>>()?,
        hound::SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                return Err(TableError::UnsupportedFormat(format!(
                    "{} bits per sample",
                    spec.bits_per_sample
                )));
            }
            let scale = if normalize {
                (1u64 << (spec.bits_per_sample - 1)) as f64
            } else {
                1.0
            };
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| f64::from(value) / scale))
                .collect::<Result<Vec<f64>, _>>()?
        }
    };

    Ok(Recording {
        samples: downmix(interleaved, spec.channels),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
