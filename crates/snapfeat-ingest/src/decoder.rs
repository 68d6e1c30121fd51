//! Feature decoder seam
//!
//! The aggregation core only ever sees this trait. Anything that can turn a
//! file's raw bytes into named sequences can be plugged in.

use crate::error::DecodeError;
use snapfeat_common::FeatureRecord;

/// Turns the raw bytes of one plasmid file into feature records.
pub trait FeatureDecoder {
    /// Decode every named feature in `bytes`.
    ///
    /// Records are returned as found, including ones too short to keep;
    /// the aggregator applies the length filter. An error means none of the
    /// file's records may be used. Decoders for formats other than SnapGene
    /// report their failures as [`DecodeError::Unsupported`].
    fn decode(&self, bytes: &[u8]) -> Result<Vec<FeatureRecord>, DecodeError>;

    /// Short identifier for logs, e.g. "snapgene".
    fn format_name(&self) -> &str;
}

impl<D: FeatureDecoder + ?Sized> FeatureDecoder for &D {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<FeatureRecord>, DecodeError> {
        (**self).decode(bytes)
    }

    fn format_name(&self) -> &str {
        (**self).format_name()
    }
}

impl<D: FeatureDecoder + ?Sized> FeatureDecoder for Box<D> {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<FeatureRecord>, DecodeError> {
        (**self).decode(bytes)
    }

    fn format_name(&self) -> &str {
        (**self).format_name()
    }
}
