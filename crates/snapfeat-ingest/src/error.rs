//! Error types for feature ingestion
//!
//! Two families live here. [`DecodeError`] describes why a single plasmid
//! file could not be turned into features; the pipeline records it and moves
//! on. [`IngestError`] is everything else, and it ends the run.

use snapfeat_common::SnapfeatError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// A file's bytes could not be interpreted as feature data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a SnapGene file: missing 'SnapGene' cookie packet")]
    NotSnapGene,

    #[error("truncated packet at byte offset {offset}")]
    Truncated { offset: usize },

    #[error("packet 0x{packet:02X} is not valid ASCII/UTF-8")]
    InvalidEncoding { packet: u8 },

    #[error("features are annotated but the file has no DNA sequence packet")]
    MissingSequence,

    #[error("invalid feature XML: {0}")]
    InvalidXml(String),

    #[error("invalid segment range '{0}'")]
    InvalidRange(String),

    #[error("segment range '{range}' exceeds sequence length {length}")]
    RangeOutOfBounds { range: String, length: usize },

    /// Catch-all for [`FeatureDecoder`](crate::decoder::FeatureDecoder)
    /// implementations of other formats whose failures fit none of the
    /// SnapGene-specific variants above.
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Fatal errors that stop an ingestion run
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Common(#[from] SnapfeatError),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),
}

impl IngestError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Common(SnapfeatError::Io(err))
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Common(SnapfeatError::Serialization(err))
    }
}
