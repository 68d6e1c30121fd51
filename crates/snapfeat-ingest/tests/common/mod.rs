//! Shared fixtures: builds SnapGene .dna files byte by byte

#![allow(dead_code)]

use std::path::Path;

/// Builder for a minimal SnapGene file
pub struct DnaFile {
    circular: bool,
    bases: Option<String>,
    features: Vec<String>,
}

impl DnaFile {
    pub fn circular(bases: &str) -> Self {
        Self {
            circular: true,
            bases: Some(bases.to_string()),
            features: Vec::new(),
        }
    }

    pub fn without_sequence() -> Self {
        Self {
            circular: false,
            bases: None,
            features: Vec::new(),
        }
    }

    /// Forward-strand feature over one 1-based inclusive range
    pub fn feature(self, name: &str, range: &str) -> Self {
        self.feature_with(name, range, 1)
    }

    pub fn feature_with(mut self, name: &str, range: &str, directionality: u8) -> Self {
        self.features.push(format!(
            r#"<Feature name="{name}" directionality="{directionality}" type="misc_feature"><Segment range="{range}" type="standard"/></Feature>"#
        ));
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut cookie = b"SnapGene".to_vec();
        cookie.extend_from_slice(&[0, 1, 0, 15, 0, 19]);

        let mut out = packet(0x09, &cookie);

        if let Some(ref bases) = self.bases {
            let mut dna = vec![u8::from(self.circular)];
            dna.extend_from_slice(bases.as_bytes());
            out.extend(packet(0x00, &dna));
        }

        if !self.features.is_empty() {
            let xml = format!(
                r#"<?xml version="1.0"?><Features nextValidID="{}">{}</Features>"#,
                self.features.len(),
                self.features.concat()
            );
            out.extend(packet(0x0A, xml.as_bytes()));
        }

        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, self.bytes()).unwrap();
    }
}

pub fn packet(kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![kind];
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}
