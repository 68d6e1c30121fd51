//! End-to-end ingestion run
//!
//! enumerate -> decode -> aggregate -> write, single-threaded and in one
//! pass. Decode failures are collected into the summary; any I/O error ends
//! the run.

use crate::aggregate::{DecodeFailure, FeatureAggregator};
use crate::config::{IngestConfig, OutputFormat};
use crate::decoder::FeatureDecoder;
use crate::enumerate::FileEnumerator;
use crate::error::{IngestError, Result};
use crate::output::write_features;
use crate::snapgene::SnapGeneDecoder;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use snapfeat_common::checksum::compute_file_checksum;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// Result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub root: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub features_written: usize,
    /// Names replaced by a later file with a different sequence
    pub overwritten: usize,
    pub failures: Vec<DecodeFailure>,
    /// sha256 of the written output
    pub output_checksum: String,
    pub generated_at: DateTime<Utc>,
}

impl IngestSummary {
    /// Failed paths, one per line, as printed at the end of a run
    pub fn failure_report(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}\n", f.path.display()))
            .collect()
    }
}

/// Run the pipeline with an arbitrary decoder
pub fn run<D>(config: &IngestConfig, decoder: &D) -> Result<IngestSummary>
where
    D: FeatureDecoder + ?Sized,
{
    let span = info_span!("ingest", root = %config.root.display(), decoder = decoder.format_name());
    let _enter = span.enter();

    let enumerator =
        FileEnumerator::new(&config.root).with_excluded_prefixes(config.excluded_prefixes());
    let mut aggregator = FeatureAggregator::new();
    let progress = progress_bar();

    for relative in enumerator.iter() {
        let relative = relative?;
        progress.set_message(relative.display().to_string());
        aggregator.accumulate(&config.root, &relative, decoder)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    write_features(&config.output, aggregator.mapping(), config.format)?;
    let output_checksum = compute_file_checksum(&config.output)?;

    let files_scanned = aggregator.files_seen();
    let overwritten = aggregator.overwritten();
    let (mapping, failures) = aggregator.into_parts();

    info!(
        files = files_scanned,
        failed = failures.len(),
        features = mapping.len(),
        overwritten,
        output = %config.output.display(),
        "Feature extraction complete"
    );

    Ok(IngestSummary {
        root: config.root.clone(),
        output: config.output.clone(),
        format: config.format,
        files_scanned,
        files_failed: failures.len(),
        features_written: mapping.len(),
        overwritten,
        failures,
        output_checksum,
        generated_at: Utc::now(),
    })
}

/// Run the pipeline over SnapGene files
pub fn ingest(config: &IngestConfig) -> Result<IngestSummary> {
    config.validate()?;
    run(config, &SnapGeneDecoder::new())
}

/// Write a summary as pretty JSON
pub fn write_summary(path: &Path, summary: &IngestSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|e| IngestError::write(path, e))?;
    Ok(())
}

/// Spinner on stderr; indicatif hides it when stderr is not a terminal.
fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} files {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use snapfeat_common::FeatureRecord;

    /// Decodes `name=SEQ` lines; anything else is rejected.
    struct LineDecoder;

    impl FeatureDecoder for LineDecoder {
        fn decode(&self, bytes: &[u8]) -> std::result::Result<Vec<FeatureRecord>, DecodeError> {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| DecodeError::Unsupported("binary".to_string()))?;
            text.lines()
                .map(|line| {
                    line.split_once('=')
                        .map(|(n, s)| FeatureRecord::new(n, s))
                        .ok_or_else(|| DecodeError::Unsupported(line.to_string()))
                })
                .collect()
        }

        fn format_name(&self) -> &str {
            "lines"
        }
    }

    #[test]
    fn test_run_writes_and_summarizes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.dna"), "promoter1=ATGCATGC").unwrap();
        std::fs::write(dir.path().join("b.dna"), "garbage").unwrap();

        let config = IngestConfig::new(dir.path());
        let summary = run(&config, &LineDecoder).unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.features_written, 1);
        assert_eq!(summary.failure_report(), "b.dna\n");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("features.tsv")).unwrap(),
            "promoter1\tATGCATGC\n"
        );
        assert_eq!(summary.output_checksum.len(), 64);
    }

    #[test]
    fn test_rerun_ignores_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.dna"), "ori=TTGA").unwrap();

        let mut config = IngestConfig::new(dir.path());
        config.set_output(dir.path().join("db.tsv"));
        let first = run(&config, &LineDecoder).unwrap();
        let second = run(&config, &LineDecoder).unwrap();

        assert_eq!(second.files_scanned, 1);
        assert!(second.failures.is_empty());
        assert_eq!(first.output_checksum, second.output_checksum);
    }

    #[test]
    fn test_rerun_ignores_output_spelled_differently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.dna"), "ori=TTGA").unwrap();

        let mut config = IngestConfig::new(dir.path());
        config.set_output(dir.path().join("sub").join("..").join("db.tsv"));
        run(&config, &LineDecoder).unwrap();
        let second = run(&config, &LineDecoder).unwrap();

        assert_eq!(second.files_scanned, 1);
        assert!(second.failures.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("db.tsv")).unwrap(),
            "ori\tTTGA\n"
        );
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig::new(dir.path());
        let summary = run(&config, &LineDecoder).unwrap();

        let path = dir.path().join("summary.json");
        write_summary(&path, &summary).unwrap();

        let parsed: IngestSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.files_scanned, 0);
        assert_eq!(parsed.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_ingest_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig::new(dir.path().join("missing"));
        assert!(ingest(&config).is_err());
    }
}
