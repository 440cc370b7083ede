use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::index::CdsStartIndex;
use crate::kozak::KozakCall;

/// Marker written for a missing start or window.
pub const NOT_AVAILABLE: &str = "NA";

/// Kozak context of one changed transcript under both annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub transcript_id: String,
    pub reference: KozakCall,
    pub revised: KozakCall,
}

/// Flat CSV shape of a [`ResultRow`]; column order is the field order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    transcript_id: &'a str,
    ref_start: String,
    ref_8mer: &'a str,
    ref_kozak: bool,
    rev_start: String,
    rev_8mer: &'a str,
    rev_kozak: bool,
}

impl<'a> From<&'a ResultRow> for CsvRow<'a> {
    fn from(row: &'a ResultRow) -> Self {
        let start = |c: &KozakCall| c.start.map_or_else(|| NOT_AVAILABLE.to_string(), |p| p.to_string());
        let mer = |c: &'a KozakCall| c.window.as_deref().unwrap_or(NOT_AVAILABLE);
        Self {
            transcript_id: &row.transcript_id,
            ref_start: start(&row.reference),
            ref_8mer: mer(&row.reference),
            ref_kozak: row.reference.is_match(),
            rev_start: start(&row.revised),
            rev_8mer: mer(&row.revised),
            rev_kozak: row.revised.is_match(),
        }
    }
}

/// Write rows as CSV (with header) to `writer`.
pub fn write_results<W: Write>(writer: W, rows: &[ResultRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(CsvRow::from(row)).context("write result row")?;
    }
    if rows.is_empty() {
        wtr.write_record([
            "transcript_id",
            "ref_start",
            "ref_8mer",
            "ref_kozak",
            "rev_start",
            "rev_8mer",
            "rev_kozak",
        ])
        .context("write result header")?;
    }
    wtr.flush().context("flush results")?;
    Ok(())
}

pub fn write_results_to_path<P: AsRef<Path>>(path: P, rows: &[ResultRow]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("create result file {}", path.display()))?;
    write_results(std::io::BufWriter::new(file), rows)
        .with_context(|| format!("write results to {}", path.display()))
}

/// Write the located CDS starts of one annotation as a two-column TSV,
/// sorted by transcript id.
pub fn write_starts<W: Write>(writer: W, index: &CdsStartIndex) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record(["transcript_id", "cds_start"])
        .context("write start header")?;
    for (tid, start) in index.sorted() {
        wtr.write_record([tid, start.to_string().as_str()])
            .with_context(|| format!("write start of {tid}"))?;
    }
    wtr.flush().context("flush starts")?;
    Ok(())
}

pub fn write_starts_to_path<P: AsRef<Path>>(path: P, index: &CdsStartIndex) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("create {}", path.display()))?;
    write_starts(std::io::BufWriter::new(file), index)
        .with_context(|| format!("write starts to {}", path.display()))
}
