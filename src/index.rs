use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

use tracing::debug;

use crate::annotation::io::{AnnotationReader, ParseError};
use crate::model::transcript::TranscriptModel;
use crate::model::types::StartFailure;

/// Configure which attribute keys and feature types feed the index:
/// - transcript identifier keys (first present wins)
/// - feature types that count as exon blocks
/// - feature types that count as CDS blocks
#[derive(Debug, Clone)]
pub struct AnnotationKeys {
    pub transcript_id_keys: Vec<String>,

    /// Feature types that count as exon blocks (default: ["exon"])
    pub exon_feature_types: Vec<String>,

    /// Feature types that count as CDS blocks (default: ["CDS"])
    pub cds_feature_types: Vec<String>,
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self {
            transcript_id_keys: vec!["transcript_id".into()],
            exon_feature_types: vec!["exon".into()],
            cds_feature_types: vec!["CDS".into()],
        }
    }
}

/// Counters collected while building a [`CdsStartIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Records parsed (after comments/blank lines).
    pub records: usize,
    /// Lines skipped for a wrong column count or an unknown strand symbol.
    pub skipped_lines: usize,
    /// Records without a recoverable transcript id.
    pub dropped_no_id: usize,
    /// Distinct transcript ids seen.
    pub transcripts: usize,
    pub with_cds: usize,
    pub missing_exons: usize,
    pub unmappable: usize,
    pub located: usize,
}

/// Transcript models of one annotation, keyed by transcript id.
///
/// Strand merge rule: a transcript's strand is the strand of the most
/// recently read record carrying its id, whatever that record's type.
pub fn collect_models<R: BufRead>(
    reader: R,
    keys: &AnnotationKeys,
    stats: &mut IndexStats,
) -> Result<HashMap<String, TranscriptModel>, ParseError> {
    let mut models: HashMap<String, TranscriptModel> = HashMap::new();

    for rec in AnnotationReader::new(reader).records() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(e) if e.is_skippable() => {
                debug!("skipping annotation line: {e}");
                stats.skipped_lines += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        stats.records += 1;

        let Some(tx_key) = rec.attrs.pick_first(&keys.transcript_id_keys) else {
            debug!(
                "line {}: no transcript id (tried keys {:?}); record dropped",
                rec.line_no, keys.transcript_id_keys
            );
            stats.dropped_no_id += 1;
            continue;
        };

        let model = models
            .entry(tx_key.to_string())
            .or_insert_with(|| TranscriptModel::new(tx_key, rec.strand));
        model.strand = rec.strand;

        if rec.is_feature_of(&keys.exon_feature_types) {
            model.add_exon(rec.block());
        } else if rec.is_feature_of(&keys.cds_feature_types) {
            model.add_cds(rec.block());
        }
    }

    stats.transcripts = models.len();
    Ok(models)
}

/// Transcript id -> 1-based transcript-relative position of the first CDS
/// base, for one annotation.
///
/// Transcripts whose start cannot be placed on the spliced sequence are
/// simply absent; the reason is counted in [`IndexStats`].
#[derive(Debug, Clone, Default)]
pub struct CdsStartIndex {
    starts: HashMap<String, u32>,
    pub stats: IndexStats,
}

/// One-line summary plus the failure breakdown, for logs.
impl fmt::Display for CdsStartIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(
            f,
            "CdsStartIndex: {} located starts, {} transcripts, {} with CDS",
            self.starts.len(),
            s.transcripts,
            s.with_cds
        )?;
        writeln!(
            f,
            "  - unlocatable: no_exons={}, outside_exons={}",
            s.missing_exons, s.unmappable
        )?;
        write!(
            f,
            "  - records={}, dropped_no_transcript_id={}, skipped_lines={}",
            s.records, s.dropped_no_id, s.skipped_lines
        )
    }
}

impl CdsStartIndex {
    /// Build the index directly from a GTF reader.
    ///
    /// # Example
    /// ```
    /// use std::io::Cursor;
    /// use kozak_shift::index::{AnnotationKeys, CdsStartIndex};
    ///
    /// let gtf = "\
    /// chr1\tsrc\texon\t101\t150\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";\n\
    /// chr1\tsrc\texon\t301\t350\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";\n\
    /// chr1\tsrc\tCDS\t306\t340\t.\t+\t0\tgene_id \"G1\"; transcript_id \"T1\";\n";
    ///
    /// let idx = CdsStartIndex::from_reader(Cursor::new(gtf.as_bytes()), &AnnotationKeys::default())
    ///     .unwrap();
    ///
    /// assert_eq!(idx.get("T1"), Some(56));
    /// ```
    pub fn from_reader<R: BufRead>(reader: R, keys: &AnnotationKeys) -> Result<Self, ParseError> {
        let mut stats = IndexStats::default();
        let models = collect_models(reader, keys, &mut stats)?;
        Ok(Self::from_models(models.values(), stats))
    }

    /// Locate the CDS start of every model that has one.
    pub fn from_models<'a, I>(models: I, mut stats: IndexStats) -> Self
    where
        I: IntoIterator<Item = &'a TranscriptModel>,
    {
        let mut starts = HashMap::new();

        for model in models {
            match model.cds_start_tx() {
                Ok(pos) => {
                    stats.with_cds += 1;
                    starts.insert(model.name.clone(), pos);
                }
                Err(StartFailure::NoCds) => {}
                Err(StartFailure::NoExons) => {
                    stats.with_cds += 1;
                    stats.missing_exons += 1;
                    debug!("{}: CDS without exons; no start", model.name);
                }
                Err(StartFailure::OutsideExons) => {
                    stats.with_cds += 1;
                    stats.unmappable += 1;
                    debug!("{}: CDS start outside all exons; no start", model.name);
                }
            }
        }

        stats.located = starts.len();
        Self { starts, stats }
    }

    pub fn get(&self, transcript_id: &str) -> Option<u32> {
        self.starts.get(transcript_id).copied()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// All located starts, sorted by transcript id.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut out: Vec<(&str, u32)> = self.starts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        out.sort_unstable();
        out
    }
}
