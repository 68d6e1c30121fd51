//! Common types used across snapfeat

use serde::{Deserialize, Serialize};

/// Features with this many bases or fewer are treated as annotation noise.
pub const MAX_NOISE_LENGTH: usize = 1;

/// A named DNA feature pulled out of a plasmid file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Feature name, the deduplication key
    pub name: String,

    /// Feature bases, 5' to 3' along the feature
    pub sequence: String,
}

impl FeatureRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    /// Whether the record is long enough to keep.
    pub fn is_retained(&self) -> bool {
        self.sequence.len() > MAX_NOISE_LENGTH
    }
}

impl std::fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bp)", self.name, self.sequence.len())
    }
}
