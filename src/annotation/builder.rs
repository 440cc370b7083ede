use std::io::BufRead;
use std::path::Path;

use tracing::info;

use crate::annotation::io::{open_bufread, ParseError};
use crate::index::{AnnotationKeys, CdsStartIndex};

/// High-level builder for creating a `CdsStartIndex` from a GTF file.
///
/// - parses the whole file (optionally gzipped)
/// - configurable transcript id key(s) and exon/CDS feature types
#[derive(Debug, Clone, Default)]
pub struct AnnotationBuilder {
    pub keys: AnnotationKeys,
}

impl AnnotationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: set transcript id key(s), first present wins.
    pub fn transcript_id_keys(mut self, keys: &[&str]) -> Self {
        self.keys.transcript_id_keys = keys.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Convenience: define what feature types count as exon blocks.
    pub fn exon_feature_types(mut self, types: &[&str]) -> Self {
        self.keys.exon_feature_types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Convenience: define what feature types count as CDS blocks.
    pub fn cds_feature_types(mut self, types: &[&str]) -> Self {
        self.keys.cds_feature_types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Build index from anything implementing `BufRead`.
    pub fn build_from_reader<R: BufRead>(&self, reader: R) -> Result<CdsStartIndex, ParseError> {
        CdsStartIndex::from_reader(reader, &self.keys)
    }

    /// Build index from a file path. Files ending in `.gz` are decompressed.
    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<CdsStartIndex, ParseError> {
        let path = path.as_ref();
        let reader = open_bufread(path)?;
        let idx = self.build_from_reader(reader)?;

        info!(
            "{}: {} CDS starts located ({} transcripts, {} with CDS)",
            path.display(),
            idx.len(),
            idx.stats.transcripts,
            idx.stats.with_cds
        );

        Ok(idx)
    }
}

// -------------------- tests --------------------
