//! SnapGene `.dna` feature decoding
//!
//! [`SnapGeneDecoder`] is the [`FeatureDecoder`] used by the `snapfeat`
//! binary. It reads the cookie, DNA and features packets of a file and
//! resolves every annotated feature to the bases it covers.
//!
//! # Example
//!
//! ```no_run
//! use snapfeat_ingest::decoder::FeatureDecoder;
//! use snapfeat_ingest::snapgene::SnapGeneDecoder;
//!
//! let bytes = std::fs::read("pUC19.dna").unwrap();
//! for record in SnapGeneDecoder::new().decode(&bytes).unwrap() {
//!     println!("{}\t{}", record.name, record.sequence);
//! }
//! ```

pub mod models;
pub mod parser;

pub use models::{Cookie, DnaSequence, Feature, Segment, SnapGeneFile, Strand, Topology};
pub use parser::SnapGeneParser;

use crate::decoder::FeatureDecoder;
use crate::error::DecodeError;
use snapfeat_common::FeatureRecord;

#[derive(Debug, Default, Clone, Copy)]
pub struct SnapGeneDecoder {
    parser: SnapGeneParser,
}

impl SnapGeneDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the features of an already parsed file.
    pub fn records(file: &SnapGeneFile) -> Result<Vec<FeatureRecord>, DecodeError> {
        if file.features.is_empty() {
            return Ok(Vec::new());
        }

        let dna = file.dna.as_ref().ok_or(DecodeError::MissingSequence)?;
        let mut records = Vec::with_capacity(file.features.len());

        for feature in &file.features {
            let name = feature.name.trim();
            if name.is_empty() {
                tracing::trace!("Skipping unnamed feature");
                continue;
            }
            if feature.segments.iter().all(|s| s.is_gap) {
                tracing::trace!(feature = name, "Skipping feature without segments");
                continue;
            }

            records.push(FeatureRecord::new(name, feature.bases(dna)?));
        }

        Ok(records)
    }
}

impl FeatureDecoder for SnapGeneDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<FeatureRecord>, DecodeError> {
        let file = self.parser.parse(bytes)?;
        Self::records(&file)
    }

    fn format_name(&self) -> &str {
        "snapgene"
    }
}
