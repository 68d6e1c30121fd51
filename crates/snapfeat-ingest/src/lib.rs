//! snapfeat ingest library
//!
//! Extracts named DNA features from a directory of SnapGene plasmid files
//! and writes them as a deduplicated name→sequence table.
//!
//! # Pipeline
//!
//! - [`enumerate::FileEnumerator`] lists candidate files under a root
//! - a [`decoder::FeatureDecoder`] (by default [`snapgene::SnapGeneDecoder`])
//!   turns each file into feature records
//! - [`aggregate::FeatureAggregator`] folds records into one mapping and
//!   records files that failed to decode
//! - [`output`] writes the mapping as TSV or JSON
//!
//! # Example
//!
//! ```no_run
//! use snapfeat_ingest::config::IngestConfig;
//! use snapfeat_ingest::pipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::new("./assets/snapgene");
//!     let summary = pipeline::ingest(&config)?;
//!     print!("{}", summary.failure_report());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod decoder;
pub mod enumerate;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod snapgene;

// Re-export commonly used types
pub use aggregate::{FeatureAggregator, FeatureMapping, FileOutcome};
pub use config::{IngestConfig, OutputFormat};
pub use decoder::FeatureDecoder;
pub use error::{DecodeError, IngestError, Result};
pub use pipeline::IngestSummary;
