//! Transcript sequences from FASTA.
//!
//! The record id is the header token after `>` up to the first whitespace.
//! Sequence lines are concatenated and upper-cased. A repeated id keeps the
//! last record.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use bio::io::fasta;
use tracing::info;

use crate::annotation::io::{open_bufread, ParseError};

/// Transcript id -> uppercase nucleotide sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceTable {
    seqs: HashMap<String, String>,
}

impl SequenceTable {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut seqs = HashMap::new();

        for (i, result) in fasta::Reader::new(reader).records().enumerate() {
            let record = result.map_err(|e| ParseError::Fasta {
                record: i + 1,
                message: e.to_string(),
            })?;
            if record.id().is_empty() {
                return Err(ParseError::MissingSequenceId { record: i + 1 });
            }
            let seq = String::from_utf8_lossy(record.seq()).to_ascii_uppercase();
            seqs.insert(record.id().to_string(), seq);
        }

        Ok(Self { seqs })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let table = Self::from_reader(open_bufread(path)?)?;
        info!("{}: {} sequences", path.display(), table.len());
        Ok(table)
    }

    /// Sequence for `id`; empty records count as missing.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.seqs
            .get(id)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table(fa: &str) -> SequenceTable {
        SequenceTable::from_reader(Cursor::new(fa.as_bytes())).unwrap()
    }

    #[test]
    fn multi_line_records_are_joined_and_uppercased() {
        let t = table(">T1 some description\nacgt\nACGT \n>T2\nGGG\r\n");
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("T1"), Some("ACGTACGT"));
        assert_eq!(t.get("T2"), Some("GGG"));
        assert_eq!(t.get("T3"), None);
    }

    #[test]
    fn last_duplicate_wins() {
        let t = table(">T1\nAAA\n>T1\nCCC\n");
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("T1"), Some("CCC"));
    }

    #[test]
    fn text_before_first_header_is_an_error() {
        let err = SequenceTable::from_reader(Cursor::new("junk\n>T1\nAAA\n".as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::Fasta { record: 1, .. }));
    }

    #[test]
    fn empty_record_is_missing() {
        let t = table(">T1\n>T2\nACGT\n");
        assert_eq!(t.get("T1"), None);
        assert_eq!(t.get("T2"), Some("ACGT"));
    }

    #[test]
    fn header_without_id_is_an_error() {
        let err = SequenceTable::from_reader(Cursor::new(">T1\nAC\n>  \nGG\n".as_bytes())).unwrap_err();
        assert!(matches!(err, ParseError::MissingSequenceId { record: 2 }));
    }
}
