//! Feature Table Builder - Main Entry Point

use anyhow::Context;
use clap::{ArgAction, Parser};
use feature_table::{init_logging, load_config, write_table, TableOptions};
use nucleus_features::FeatureExtractor;
use std::path::PathBuf;
use tracing::info;

/// Compute syllable nucleus features for WAV files, one JSON line per file
#[derive(Debug, Parser)]
#[command(name = "feature-table", version, about)]
struct Cli {
    /// Policy table file (TOML, JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scale integer samples into [-1, 1]
    #[arg(long)]
    normalize: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// WAV files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json).context("installing log subscriber")?;

    info!("=== Feature Table v{} ===", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;
    let extractor = FeatureExtractor::new(config);
    let options = TableOptions {
        normalize: cli.normalize,
        fail_fast: cli.fail_fast,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_table(&cli.files, &extractor, &options, &mut out).context("building feature table")?;

    Ok(())
}
