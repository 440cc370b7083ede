use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::types::{RefBlock, Strand};

/// Number of tab-separated columns in a GTF line.
const GTF_COLUMNS: usize = 9;

/// Parsed attribute column of a GTF record.
///
/// Accepts both `key "value";` and bare `key value;` pairs. A key that
/// appears more than once keeps its last value. Lookups of absent keys
/// return `None`; attribute parsing itself never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    map: HashMap<String, String>,
}

impl Attributes {
    pub fn parse(s: &str) -> Self {
        let mut map = HashMap::new();

        for part in s.trim().split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let mut it = part.splitn(2, char::is_whitespace);
            let key = it.next().unwrap_or("").trim();
            let rest = it.next().unwrap_or("").trim();

            if key.is_empty() {
                continue;
            }
            let value = unquote(rest);
            if !value.is_empty() {
                map.insert(key.to_string(), value);
            }
        }

        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    /// First non-empty value among `keys`, in preference order.
    pub fn pick_first(&self, keys: &[String]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A single parsed record line from a GTF file.
///
/// Coordinates:
/// - `start0` is 0-based start
/// - `end0` is 0-based end (half-open)
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub line_no: usize,
    pub seqname: String,      // chromosome / contig
    pub source: String,       // column 2
    pub feature_type: String, // column 3
    pub start0: u32,          // 0-based start
    pub end0: u32,            // 0-based end (half-open)
    pub score: Option<f32>,   // '.' or unparsable => None
    pub strand: Strand,       // + / - / . / ?
    pub phase: Option<u8>,    // 0/1/2, anything else => None
    pub attrs: Attributes,
}

impl AnnotationRecord {
    /// Convenience: get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn is_feature_of(&self, types: &[String]) -> bool {
        types.iter().any(|t| t == &self.feature_type)
    }

    pub fn block(&self) -> RefBlock {
        RefBlock::new(self.start0, self.end0)
    }
}

/// Parsing errors for GTF and FASTA input.
#[derive(Debug)]
pub enum ParseError {
    IoPath { path: String, source: std::io::Error },
    WrongColumnCount { line_no: usize, found: usize },
    BadStrand { line_no: usize, found: String },
    BadCoordinates { line_no: usize, line: String },
    Fasta { record: usize, message: String },
    MissingSequenceId { record: usize },
}

impl ParseError {
    /// Per-line problems that a reader may skip instead of aborting on.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            ParseError::WrongColumnCount { .. } | ParseError::BadStrand { .. }
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IoPath { path, source } => {
                write!(f, "I/O error while reading '{}': {}", path, source)
            }
            ParseError::WrongColumnCount { line_no, found } => write!(
                f,
                "line {}: expected {} tab-separated columns, found {}",
                line_no, GTF_COLUMNS, found
            ),
            ParseError::BadStrand { line_no, found } => {
                write!(f, "line {}: unknown strand symbol '{}'", line_no, found)
            }
            ParseError::BadCoordinates { line_no, line } => {
                write!(f, "line {}: bad coordinates: {}", line_no, line)
            }
            ParseError::Fasta { record, message } => {
                write!(f, "FASTA record {}: {}", record, message)
            }
            ParseError::MissingSequenceId { record } => {
                write!(f, "FASTA record {}: header without a sequence id", record)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoPath { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Low-level streaming parser for GTF files.
///
/// Most users should go through [`crate::annotation::AnnotationBuilder`],
/// which turns a whole file into a [`crate::index::CdsStartIndex`].
///
/// # Example
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
/// use kozak_shift::annotation::io::AnnotationReader;
///
/// let file = File::open("genes.gtf").unwrap();
/// let rdr = AnnotationReader::new(BufReader::new(file));
/// for rec in rdr.records() {
///     let rec = rec.unwrap();
///     println!("{} {}-{}", rec.seqname, rec.start0, rec.end0);
/// }
/// ```
pub struct AnnotationReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> AnnotationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Returns an iterator over parsed records.
    ///
    /// - Skips blank lines
    /// - Skips comment lines starting with '#'
    pub fn records(mut self) -> impl Iterator<Item = Result<AnnotationRecord, ParseError>> {
        std::iter::from_fn(move || loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => {
                    return Some(Err(ParseError::IoPath {
                        path: "<reader>".to_string(),
                        source: e,
                    }))
                }
            }

            let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            return Some(parse_record_line(line, self.line_no));
        })
    }
}

/// Parse a single non-comment line into an `AnnotationRecord`.
pub fn parse_record_line(line: &str, line_no: usize) -> Result<AnnotationRecord, ParseError> {
    // seqname source feature start end score strand phase attributes
    let cols: Vec<&str> = line.trim_end().split('\t').collect();
    if cols.len() != GTF_COLUMNS {
        return Err(ParseError::WrongColumnCount {
            line_no,
            found: cols.len(),
        });
    }

    let bad_coords = || ParseError::BadCoordinates {
        line_no,
        line: line.to_string(),
    };

    // Coordinates: input is 1-based inclusive; convert to 0-based half-open [start-1, end)
    let start_1: u32 = cols[3].trim().parse().map_err(|_| bad_coords())?;
    let end_1: u32 = cols[4].trim().parse().map_err(|_| bad_coords())?;

    if start_1 == 0 || end_1 < start_1 {
        return Err(bad_coords());
    }

    // Score and phase are never used downstream; junk in them is not an error.
    let score = cols[5].parse::<f32>().ok();

    let strand = match cols[6] {
        "+" => Strand::Plus,
        "-" => Strand::Minus,
        "." | "?" => Strand::Unknown,
        other => {
            return Err(ParseError::BadStrand {
                line_no,
                found: other.to_string(),
            })
        }
    };

    let phase = cols[7].parse::<u8>().ok().filter(|p| *p <= 2);

    Ok(AnnotationRecord {
        line_no,
        seqname: cols[0].to_string(),
        source: cols[1].to_string(),
        feature_type: cols[2].to_string(),
        start0: start_1 - 1,
        end0: end_1,
        score,
        strand,
        phase,
        attrs: Attributes::parse(cols[8]),
    })
}

/// Open a text input as `BufRead`, transparently decompressing `.gz` files.
pub fn open_bufread(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path).map_err(|e| ParseError::IoPath {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_gz = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn unquote(v: &str) -> String {
    let v = v.trim();
    let v = v.strip_prefix('"').unwrap_or(v);
    let v = v.strip_suffix('"').unwrap_or(v);
    v.to_string()
}
