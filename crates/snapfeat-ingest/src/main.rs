//! snapfeat - SnapGene feature extraction tool

use anyhow::{Context, Result};
use clap::Parser;
use snapfeat_common::logging::{init_logging, LogConfig, LogLevel};
use snapfeat_ingest::config::{IngestConfig, OutputFormat, DEFAULT_ROOT};
use snapfeat_ingest::pipeline;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "snapfeat")]
#[command(author, version, about = "Extract named DNA features from SnapGene files")]
struct Cli {
    /// Directory searched recursively for .dna files
    #[arg(short, long, env = "SNAPFEAT_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Output file (defaults to features.tsv or features.json inside the root)
    #[arg(short, long, env = "SNAPFEAT_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format (tsv, json)
    #[arg(short, long, env = "SNAPFEAT_FORMAT", default_value = "tsv")]
    format: OutputFormat,

    /// Extra root-relative path prefixes to skip (repeatable or comma-separated)
    #[arg(short = 'x', long = "exclude", env = "SNAPFEAT_EXCLUDE", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// `LOG_*` variables over the defaults, then `--verbose` over both
    fn log_config(&self) -> Result<LogConfig> {
        let mut config = LogConfig::builder()
            .log_file_prefix("snapfeat")
            .build()
            .merge_env()?;

        if self.verbose {
            config.level = LogLevel::Debug;
        }

        Ok(config)
    }

    fn ingest_config(&self) -> IngestConfig {
        let mut config = IngestConfig::new(&self.root);
        config.set_format(self.format);
        if let Some(ref output) = self.output {
            config.set_output(output);
        }
        for prefix in &self.exclude {
            config.add_excluded_prefix(prefix);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_config()?)?;

    let config = cli.ingest_config();
    debug!(?config, "Resolved configuration");

    let summary = pipeline::ingest(&config)
        .with_context(|| format!("Feature extraction from '{}' failed", config.root.display()))?;

    if let Some(ref path) = cli.summary {
        pipeline::write_summary(path, &summary)
            .with_context(|| format!("Failed to write summary to '{}'", path.display()))?;
        info!(path = %path.display(), "Summary written");
    }

    // The only failure report: skipped files on stdout
    print!("{}", summary.failure_report());

    Ok(())
}
