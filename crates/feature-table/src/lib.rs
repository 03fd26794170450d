//! Syllable Nucleus Feature Table Builder
//!
//! Loads WAV recordings of isolated syllable nuclei and writes one JSON
//! feature record per file for classifier training.

pub mod audio;

use nucleus_features::{FeatureConfig, FeatureError, FeatureExtractor, FeatureVector};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "NUCLEUS";

/// Table builder error types
#[derive(Error, Debug)]
pub enum TableError {
    #[error("WAV decoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Feature extraction failed: {0}")]
    Features(#[from] FeatureError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One row of the feature table
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRecord {
    /// Source file
    pub path: String,
    /// Sample rate of the source file (Hz)
    pub sample_rate: u32,
    /// Named feature slots
    pub features: FeatureVector,
}

/// Options for a table build
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Scale integer samples into [-1, 1]
    pub normalize: bool,
    /// Stop at the first failing file
    pub fail_fast: bool,
}

/// Outcome of a table build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSummary {
    /// Records written
    pub written: usize,
    /// Files skipped after an error
    pub skipped: usize,
}

/// Initialize logging to stderr
pub fn init_logging(verbosity: u8, json: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Load the policy table: defaults, then an optional file, then `NUCLEUS_*` variables
pub fn load_config(path: Option<&Path>) -> Result<FeatureConfig, TableError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], reading variables from `env` instead of the process
/// environment when given
pub fn load_config_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<FeatureConfig, TableError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let config: FeatureConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Extract the feature record of one file
pub fn build_record(
    path: &Path,
    extractor: &FeatureExtractor,
    options: &TableOptions,
) -> Result<FeatureRecord, TableError> {
    let recording = audio::read_wav(path, options.normalize)?;
    debug!(
        "Loaded {}: {} samples at {} Hz, {} channel(s)",
        path.display(),
        recording.samples.len(),
        recording.sample_rate,
        recording.channels
    );

    let features = extractor.try_extract(&recording.samples, recording.sample_rate)?;
    Ok(FeatureRecord {
        path: path.display().to_string(),
        sample_rate: recording.sample_rate,
        features,
    })
}

/// Write one JSON line per file to `out`
pub fn write_table<W: Write>(
    paths: &[PathBuf],
    extractor: &FeatureExtractor,
    options: &TableOptions,
    out: &mut W,
) -> Result<TableSummary, TableError> {
    let mut summary = TableSummary::default();

    for path in paths {
        match build_record(path, extractor, options) {
            Ok(record) => {
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
                summary.written += 1;
            }
            Err(e) if !options.fail_fast => {
                warn!("Skipping {}: {}", path.display(), e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    out.flush()?;
    info!(
        "Feature table complete: {} written, {} skipped",
        summary.written, summary.skipped
    );
    Ok(summary)
}
