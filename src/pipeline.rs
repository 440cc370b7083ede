use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::annotation::AnnotationBuilder;
use crate::compare::{read_changed_from_path, ComparisonColumns, UnknownFlagPolicy};
use crate::index::{AnnotationKeys, CdsStartIndex};
use crate::kozak::KozakCall;
use crate::report::{write_results_to_path, ResultRow};
use crate::sequence::SequenceTable;

/// Joins both annotations' CDS starts with the transcript sequences.
#[derive(Debug, Clone, Copy)]
pub struct KozakComparison<'a> {
    pub reference: &'a CdsStartIndex,
    pub revised: &'a CdsStartIndex,
    pub sequences: &'a SequenceTable,
}

impl<'a> KozakComparison<'a> {
    pub fn new(
        reference: &'a CdsStartIndex,
        revised: &'a CdsStartIndex,
        sequences: &'a SequenceTable,
    ) -> Self {
        Self {
            reference,
            revised,
            sequences,
        }
    }

    /// Row for one transcript, or `None` if it has no sequence.
    ///
    /// The two sides are evaluated independently.
    pub fn evaluate(&self, transcript_id: &str) -> Option<ResultRow> {
        let seq = self.sequences.get(transcript_id)?;
        Some(ResultRow {
            transcript_id: transcript_id.to_string(),
            reference: KozakCall::new(seq, self.reference.get(transcript_id)),
            revised: KozakCall::new(seq, self.revised.get(transcript_id)),
        })
    }

    /// One row per id with a sequence, in the order given.
    pub fn run(&self, changed: &[String]) -> Vec<ResultRow> {
        let rows: Vec<ResultRow> = changed.iter().filter_map(|id| self.evaluate(id)).collect();
        info!(
            "{} result rows ({} changed transcripts without sequence)",
            rows.len(),
            changed.len() - rows.len()
        );
        rows
    }
}

/// Inputs and options of a full run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub compare_csv: PathBuf,
    pub ref_gtf: PathBuf,
    pub rev_gtf: PathBuf,
    pub tx_fasta: PathBuf,
    pub columns: ComparisonColumns,
    pub policy: UnknownFlagPolicy,
    pub keys: AnnotationKeys,
    pub out_prefix: String,
}

impl RunConfig {
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_results.csv", self.out_prefix))
    }
}

/// Load every input, score the changed transcripts and write the result
/// table. Returns the path written.
pub fn run(config: &RunConfig) -> Result<PathBuf> {
    let changed = read_changed_from_path(&config.compare_csv, &config.columns, config.policy)?;

    let builder = AnnotationBuilder {
        keys: config.keys.clone(),
    };
    let reference = builder
        .build_from_path(&config.ref_gtf)
        .with_context(|| format!("build CDS starts from {}", config.ref_gtf.display()))?;
    let revised = builder
        .build_from_path(&config.rev_gtf)
        .with_context(|| format!("build CDS starts from {}", config.rev_gtf.display()))?;

    let sequences = SequenceTable::from_path(&config.tx_fasta)
        .with_context(|| format!("read transcript sequences {}", config.tx_fasta.display()))?;

    let rows = KozakComparison::new(&reference, &revised, &sequences).run(&changed);

    let out = config.output_path();
    write_results_to_path(&out, &rows)?;
    Ok(out)
}
