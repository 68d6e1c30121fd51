//! Feature mapping serialization
//!
//! TSV is `name<TAB>sequence<LF>` per entry, in name order, with no header
//! and no quoting. Names are assumed free of tabs and newlines.

use crate::aggregate::FeatureMapping;
use crate::config::OutputFormat;
use crate::error::{IngestError, Result};
use snapfeat_common::SnapfeatError;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Write the mapping as TSV
pub fn write_tsv<W: Write>(mapping: &FeatureMapping, writer: W) -> Result<()> {
    let mut tsv = tsv_writer(writer);
    for (name, sequence) in mapping {
        tsv.write_record([name.as_str(), sequence.as_str()])?;
    }
    tsv.flush()?;
    Ok(())
}

/// Write the mapping as a pretty-printed JSON object
pub fn write_json<W: Write>(mapping: &FeatureMapping, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, mapping)?;
    Ok(())
}

/// Truncate-create `path` and write the mapping in `format`.
pub fn write_features(path: &Path, mapping: &FeatureMapping, format: OutputFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| IngestError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Tsv => write_tsv(mapping, &mut writer)?,
        OutputFormat::Json => write_json(mapping, &mut writer)?,
    }

    writer.flush().map_err(|e| IngestError::write(path, e))?;
    Ok(())
}

/// Parse TSV written by [`write_tsv`] back into a mapping.
///
/// Blank lines are skipped. A line that is not exactly two tab-separated
/// fields is a parse error.
pub fn read_tsv<R: Read>(reader: R) -> Result<FeatureMapping> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut mapping = FeatureMapping::new();
    for (index, record) in tsv.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        match (record.get(0), record.get(1), record.len()) {
            (Some(name), Some(sequence), 2) => {
                mapping.insert(name.to_string(), sequence.to_string());
            },
            _ => {
                return Err(SnapfeatError::parse(
                    line,
                    format!("expected 'name<TAB>sequence', found {} field(s)", record.len()),
                )
                .into())
            },
        }
    }

    Ok(mapping)
}

/// Read a TSV file from disk
pub fn read_tsv_file(path: &Path) -> Result<FeatureMapping> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    read_tsv(file)
}
