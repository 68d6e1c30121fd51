//! Feature aggregation across files
//!
//! Each file is decoded into a [`FileOutcome`] first and only then applied,
//! so a file that fails half-way never contributes records. Names collide
//! last-write-wins: the file enumerated later replaces the sequence.

use crate::decoder::FeatureDecoder;
use crate::error::{DecodeError, IngestError, Result};
use serde::{Deserialize, Serialize};
use snapfeat_common::FeatureRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Feature name to sequence, iterated in name order
pub type FeatureMapping = BTreeMap<String, String>;

/// What decoding one file produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Decoded(Vec<FeatureRecord>),
    Failed(DecodeError),
}

/// A file skipped because it could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeFailure {
    /// Path relative to the input root
    pub path: PathBuf,
    pub reason: String,
}

/// Read `path` in full and decode it.
///
/// Only I/O errors are returned as `Err`; a decoder rejection is a
/// [`FileOutcome::Failed`]. The file handle is closed before decoding starts.
pub fn decode_file<D>(path: &Path, decoder: &D) -> Result<FileOutcome>
where
    D: FeatureDecoder + ?Sized,
{
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;

    Ok(match decoder.decode(&bytes) {
        Ok(records) => FileOutcome::Decoded(records),
        Err(e) => FileOutcome::Failed(e),
    })
}

#[derive(Debug, Default, Clone)]
pub struct FeatureAggregator {
    mapping: FeatureMapping,
    failures: Vec<DecodeFailure>,
    files_seen: usize,
    overwritten: usize,
}

impl FeatureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `root/relative` and fold it in. Returns the number of records
    /// applied; 0 for a failed file.
    pub fn accumulate<D>(&mut self, root: &Path, relative: &Path, decoder: &D) -> Result<usize>
    where
        D: FeatureDecoder + ?Sized,
    {
        let outcome = decode_file(&root.join(relative), decoder)?;
        Ok(self.apply(relative, outcome))
    }

    /// Fold a decoded file into the mapping, or record its failure.
    pub fn apply(&mut self, path: impl Into<PathBuf>, outcome: FileOutcome) -> usize {
        let path = path.into();
        self.files_seen += 1;

        match outcome {
            FileOutcome::Decoded(records) => {
                let found = records.len();
                let mut applied = 0;

                for record in records.into_iter().filter(FeatureRecord::is_retained) {
                    if let Some(previous) =
                        self.mapping.insert(record.name.clone(), record.sequence.clone())
                    {
                        if previous != record.sequence {
                            self.overwritten += 1;
                            debug!(
                                feature = %record.name,
                                file = %path.display(),
                                "Feature redefined with a different sequence"
                            );
                        }
                    }
                    applied += 1;
                }

                debug!(file = %path.display(), found, applied, "Decoded file");
                applied
            },
            FileOutcome::Failed(e) => {
                warn!(file = %path.display(), error = %e, "Skipping undecodable file");
                self.failures.push(DecodeFailure {
                    path,
                    reason: e.to_string(),
                });
                0
            },
        }
    }

    pub fn mapping(&self) -> &FeatureMapping {
        &self.mapping
    }

    pub fn failures(&self) -> &[DecodeFailure] {
        &self.failures
    }

    /// Number of files applied so far, failed ones included
    pub fn files_seen(&self) -> usize {
        self.files_seen
    }

    /// Names whose sequence was replaced by a different one
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    pub fn into_parts(self) -> (FeatureMapping, Vec<DecodeFailure>) {
        (self.mapping, self.failures)
    }
}
