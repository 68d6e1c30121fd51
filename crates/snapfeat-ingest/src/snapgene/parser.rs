// SnapGene .dna parser
//
// A .dna file is a flat run of packets: one type byte, a big-endian u32
// payload length, then the payload. The first packet is always the cookie.
// Only the cookie, DNA and features packets are read; everything else
// (primers, notes, history, alignments) is skipped.

use super::models::{Cookie, DnaSequence, Feature, Segment, SnapGeneFile, Strand, Topology};
use crate::error::DecodeError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub const PACKET_DNA: u8 = 0x00;
pub const PACKET_COOKIE: u8 = 0x09;
pub const PACKET_FEATURES: u8 = 0x0A;

const COOKIE_MAGIC: &[u8] = b"SnapGene";
const HEADER_LEN: usize = 5;

/// A raw packet borrowed from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    pub kind: u8,
    /// Byte offset of the packet header within the file
    pub offset: usize,
    pub payload: &'a [u8],
}

/// Iterates packets; yields an error and stops at the first truncated one.
pub struct PacketReader<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> PacketReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for PacketReader<'a> {
    type Item = Result<Packet<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let offset = self.offset;
        let truncated = || DecodeError::Truncated { offset };

        let header = match self.data.get(offset..offset + HEADER_LEN) {
            Some(header) => header,
            None => {
                self.failed = true;
                return Some(Err(truncated()));
            },
        };

        let kind = header[0];
        let length = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
        let start = offset + HEADER_LEN;

        let payload = match start.checked_add(length).and_then(|end| self.data.get(start..end)) {
            Some(payload) => payload,
            None => {
                self.failed = true;
                return Some(Err(truncated()));
            },
        };

        self.offset = start + length;
        Some(Ok(Packet {
            kind,
            offset,
            payload,
        }))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SnapGeneParser;

impl SnapGeneParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the packets of a .dna file
    pub fn parse(&self, data: &[u8]) -> Result<SnapGeneFile, DecodeError> {
        let mut packets = PacketReader::new(data);

        let cookie = match packets.next() {
            Some(Ok(packet)) if packet.kind == PACKET_COOKIE => Self::parse_cookie(packet.payload)?,
            Some(Err(DecodeError::Truncated { .. })) | Some(Ok(_)) | None => {
                return Err(DecodeError::NotSnapGene)
            },
            Some(Err(e)) => return Err(e),
        };

        let mut file = SnapGeneFile {
            cookie,
            ..Default::default()
        };

        for packet in packets {
            let packet = packet?;
            match packet.kind {
                PACKET_DNA => file.dna = Some(Self::parse_dna(packet.payload)?),
                PACKET_FEATURES => file.features.extend(Self::parse_features(packet.payload)?),
                other => {
                    tracing::trace!(packet = other, offset = packet.offset, "Skipping packet");
                },
            }
        }

        Ok(file)
    }

    /// Cookie payload: "SnapGene" then three big-endian u16 fields.
    fn parse_cookie(payload: &[u8]) -> Result<Cookie, DecodeError> {
        if !payload.starts_with(COOKIE_MAGIC) {
            return Err(DecodeError::NotSnapGene);
        }

        let field = |at: usize| {
            payload
                .get(at..at + 2)
                .map(|b| u16::from_be_bytes([b[0], b[1]]))
                .unwrap_or(0)
        };

        Ok(Cookie {
            sequence_type: field(8),
            export_version: field(10),
            import_version: field(12),
        })
    }

    /// DNA payload: a flags byte (bit 0 = circular) then ASCII bases.
    fn parse_dna(payload: &[u8]) -> Result<DnaSequence, DecodeError> {
        let (flags, bases) = match payload.split_first() {
            Some((flags, bases)) => (*flags, bases),
            None => (0, &[][..]),
        };

        if !bases.is_ascii() {
            return Err(DecodeError::InvalidEncoding { packet: PACKET_DNA });
        }

        let topology = if flags & 0x01 != 0 {
            Topology::Circular
        } else {
            Topology::Linear
        };

        Ok(DnaSequence {
            topology,
            bases: String::from_utf8_lossy(bases).into_owned(),
        })
    }

    /// Features payload: an XML `<Features>` document.
    fn parse_features(payload: &[u8]) -> Result<Vec<Feature>, DecodeError> {
        let xml = std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidEncoding {
            packet: PACKET_FEATURES,
        })?;

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut features = Vec::new();
        let mut current: Option<Feature> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) | Event::Empty(e)
                    if e.name().as_ref() == b"Feature" && current.is_some() =>
                {
                    return Err(DecodeError::InvalidXml("nested <Feature> element".to_string()));
                },
                Event::Start(e) if e.name().as_ref() == b"Feature" => {
                    current = Some(Self::feature_from(&e)?);
                },
                Event::Empty(e) if e.name().as_ref() == b"Feature" => {
                    features.push(Self::feature_from(&e)?);
                },
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Segment" => {
                    if let Some(feature) = current.as_mut() {
                        feature.segments.push(Self::segment_from(&e)?);
                    }
                },
                Event::End(e) if e.name().as_ref() == b"Feature" => {
                    features.extend(current.take());
                },
                Event::Eof if current.is_some() => {
                    return Err(DecodeError::InvalidXml("unclosed <Feature> element".to_string()));
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(features)
    }

    fn feature_from(e: &BytesStart<'_>) -> Result<Feature, DecodeError> {
        Ok(Feature {
            name: attribute(e, "name")?.unwrap_or_default(),
            feature_type: attribute(e, "type")?,
            strand: Strand::from_directionality(attribute(e, "directionality")?.as_deref()),
            segments: Vec::new(),
        })
    }

    fn segment_from(e: &BytesStart<'_>) -> Result<Segment, DecodeError> {
        let range = attribute(e, "range")?
            .ok_or_else(|| DecodeError::InvalidRange(String::new()))?;
        let is_gap = attribute(e, "type")?.is_some_and(|t| t.eq_ignore_ascii_case("gap"));
        Segment::parse_range(&range, is_gap)
    }
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, DecodeError> {
    match e.try_get_attribute(key).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

fn xml_error(err: impl std::fmt::Display) -> DecodeError {
    DecodeError::InvalidXml(err.to_string())
}
