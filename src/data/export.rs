//! CSV serialization of the export projection.
//!
//! Output is UTF-8, comma separated, LF terminated, with the flat column names
//! as the header row. Fields are quoted only when they need to be.

use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator};

use super::report::ExportTable;

/// Default file name offered for the download.
pub const EXPORT_FILE_NAME: &str = "filtered_report.csv";
/// MIME type of the export.
pub const EXPORT_MIME: &str = "text/csv";

fn writer<W: std::io::Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Serialize an export table to CSV bytes.
pub fn to_csv_bytes(table: &ExportTable) -> Result<Vec<u8>> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(&table.columns)
        .context("writing CSV header")?;
    for (i, row) in table.rows.iter().enumerate() {
        wtr.write_record(row)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))
}

/// Write an export table to `path`.
pub fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(table)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Read an export back from CSV bytes.
pub fn parse_csv(bytes: &[u8]) -> Result<ExportTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }
    Ok(ExportTable { columns, rows })
}
