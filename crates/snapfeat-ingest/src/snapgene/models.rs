// Data models for SnapGene .dna files

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Header fields from the cookie packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cookie {
    pub sequence_type: u16,
    pub export_version: u16,
    pub import_version: u16,
}

/// Molecule topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    #[default]
    Linear,
    Circular,
}

/// DNA packet contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaSequence {
    pub topology: Topology,
    /// ASCII bases exactly as stored
    pub bases: String,
}

impl DnaSequence {
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Feature strand, from the `directionality` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    #[default]
    None,
    Forward,
    Reverse,
    Both,
}

impl Strand {
    pub fn from_directionality(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") => Strand::Forward,
            Some("2") => Strand::Reverse,
            Some("3") => Strand::Both,
            _ => Strand::None,
        }
    }
}

/// One `<Segment>` of a feature. Coordinates are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub is_gap: bool,
}

impl Segment {
    /// Parse a `"start-end"` range attribute.
    pub fn parse_range(range: &str, is_gap: bool) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidRange(range.to_string());

        let (start, end) = range.trim().split_once('-').ok_or_else(invalid)?;
        let start: usize = start.trim().parse().map_err(|_| invalid())?;
        let end: usize = end.trim().parse().map_err(|_| invalid())?;

        if start == 0 || end == 0 {
            return Err(invalid());
        }

        Ok(Self { start, end, is_gap })
    }

    fn range_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// Bases covered by this segment; wraps the origin on circular molecules.
    pub fn slice<'a>(&self, dna: &'a DnaSequence) -> Result<std::borrow::Cow<'a, str>, DecodeError> {
        let length = dna.len();
        if self.start > length || self.end > length {
            return Err(DecodeError::RangeOutOfBounds {
                range: self.range_label(),
                length,
            });
        }

        if self.start <= self.end {
            return Ok(std::borrow::Cow::Borrowed(&dna.bases[self.start - 1..self.end]));
        }

        match dna.topology {
            Topology::Circular => {
                let mut wrapped = String::with_capacity(length - self.start + 1 + self.end);
                wrapped.push_str(&dna.bases[self.start - 1..]);
                wrapped.push_str(&dna.bases[..self.end]);
                Ok(std::borrow::Cow::Owned(wrapped))
            },
            Topology::Linear => Err(DecodeError::InvalidRange(self.range_label())),
        }
    }
}

/// An annotated feature from the features packet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub feature_type: Option<String>,
    pub strand: Strand,
    pub segments: Vec<Segment>,
}

impl Feature {
    /// The feature's bases: its non-gap segments joined in document order,
    /// reverse-complemented for reverse-strand features.
    pub fn bases(&self, dna: &DnaSequence) -> Result<String, DecodeError> {
        let mut bases = String::new();
        for segment in self.segments.iter().filter(|s| !s.is_gap) {
            bases.push_str(&segment.slice(dna)?);
        }

        if self.strand == Strand::Reverse {
            bases = reverse_complement(&bases);
        }

        Ok(bases)
    }
}

/// A fully decoded SnapGene file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapGeneFile {
    pub cookie: Cookie,
    pub dna: Option<DnaSequence>,
    pub features: Vec<Feature>,
}

/// Reverse complement over the IUPAC alphabet, preserving case.
/// Characters outside the alphabet are kept as-is.
pub fn reverse_complement(bases: &str) -> String {
    bases.chars().rev().map(complement).collect()
}

fn complement(base: char) -> char {
    let upper = match base.to_ascii_uppercase() {
        'A' => 'T',
        'T' | 'U' => 'A',
        'C' => 'G',
        'G' => 'C',
        'R' => 'Y',
        'Y' => 'R',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        other => other,
    };

    if base.is_ascii_lowercase() {
        upper.to_ascii_lowercase()
    } else {
        upper
    }
}
