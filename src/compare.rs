//! Changed-transcript filter over a per-transcript PTC comparison table.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use tracing::{debug, info};

/// A PTC flag cell, parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PtcFlag {
    True,
    False,
    Unknown,
}

impl PtcFlag {
    /// `1/true/yes/y` and `0/false/no/n`; anything else (or no cell) is `Unknown`.
    ///
    /// Surrounding whitespace is ignored, so a padded ` y ` is `True`.
    pub fn parse(cell: Option<&str>) -> Self {
        let Some(cell) = cell else {
            return PtcFlag::Unknown;
        };
        match cell.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => PtcFlag::True,
            "0" | "false" | "no" | "n" => PtcFlag::False,
            _ => PtcFlag::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != PtcFlag::Unknown
    }
}

/// How an `Unknown` flag on one side takes part in the changed test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum UnknownFlagPolicy {
    /// Unknown is a third value: Unknown vs True/False is a change,
    /// Unknown vs Unknown is not.
    #[default]
    Changed,

    /// A row with any Unknown flag is never a change.
    Ignore,
}

impl UnknownFlagPolicy {
    pub fn is_changed(self, reference: PtcFlag, revised: PtcFlag) -> bool {
        match self {
            UnknownFlagPolicy::Changed => reference != revised,
            UnknownFlagPolicy::Ignore => {
                reference.is_known() && revised.is_known() && reference != revised
            }
        }
    }
}

/// Column names of the comparison table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonColumns {
    pub transcript_id: String,
    pub reference_flag: String,
    pub revised_flag: String,
}

impl Default for ComparisonColumns {
    fn default() -> Self {
        Self {
            transcript_id: "transcript_id".into(),
            reference_flag: "is_PTC50nt_ref".into(),
            revised_flag: "is_PTC50nt_revise".into(),
        }
    }
}

/// Ids of transcripts whose PTC flag differs between the two annotations,
/// in table order.
///
/// Flag columns may be missing entirely (every flag on that side is then
/// `Unknown`); a missing transcript id column is an error.
pub fn read_changed<R: Read>(
    reader: R,
    columns: &ComparisonColumns,
    policy: UnknownFlagPolicy,
) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().context("read comparison table header")?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let Some(tx_idx) = position(&columns.transcript_id) else {
        bail!(
            "comparison table has no '{}' column (found: {:?})",
            columns.transcript_id,
            headers.iter().collect::<Vec<_>>()
        );
    };
    let ref_idx = position(&columns.reference_flag);
    let rev_idx = position(&columns.revised_flag);
    if ref_idx.is_none() || rev_idx.is_none() {
        debug!(
            "flag column(s) missing: {}={:?}, {}={:?}",
            columns.reference_flag, ref_idx, columns.revised_flag, rev_idx
        );
    }

    let mut changed = Vec::new();
    let mut rows = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read comparison table row {}", i + 2))?;
        rows += 1;

        let Some(tid) = record.get(tx_idx) else {
            bail!("comparison table row {} has no '{}' cell", i + 2, columns.transcript_id);
        };

        let reference = PtcFlag::parse(ref_idx.and_then(|j| record.get(j)));
        let revised = PtcFlag::parse(rev_idx.and_then(|j| record.get(j)));
        if policy.is_changed(reference, revised) {
            changed.push(tid.trim().to_string());
        }
    }

    info!("{} of {} transcripts changed PTC status", changed.len(), rows);
    Ok(changed)
}

pub fn read_changed_from_path<P: AsRef<Path>>(
    path: P,
    columns: &ComparisonColumns,
    policy: UnknownFlagPolicy,
) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("open comparison table {}", path.display()))?;
    read_changed(file, columns, policy)
        .with_context(|| format!("read comparison table {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
transcript_id,gene,is_PTC50nt_ref,is_PTC50nt_revise
T1,G1,True,False
T2,G1,yes,Y
T3,G2,0,1
 T4 ,G3,n,NO
T5,G4,NA,true
T6,G4,,
T7,G5,maybe,false
";

    fn changed(table: &str, policy: UnknownFlagPolicy) -> Vec<String> {
        read_changed(table.as_bytes(), &ComparisonColumns::default(), policy).unwrap()
    }

    #[test]
    fn flag_parsing_is_three_valued() {
        assert_eq!(PtcFlag::parse(Some("TRUE")), PtcFlag::True);
        assert_eq!(PtcFlag::parse(Some("1")), PtcFlag::True);
        assert_eq!(PtcFlag::parse(Some("No")), PtcFlag::False);
        assert_eq!(PtcFlag::parse(Some("0")), PtcFlag::False);
        assert_eq!(PtcFlag::parse(Some("NA")), PtcFlag::Unknown);
        assert_eq!(PtcFlag::parse(Some("")), PtcFlag::Unknown);
        assert_eq!(PtcFlag::parse(None), PtcFlag::Unknown);
    }

    #[test]
    fn padded_flag_cells_are_trimmed() {
        assert_eq!(PtcFlag::parse(Some(" y ")), PtcFlag::True);
        assert_eq!(PtcFlag::parse(Some("\tFalse ")), PtcFlag::False);
        assert_eq!(PtcFlag::parse(Some("   ")), PtcFlag::Unknown);

        // Padding alone never makes a transcript changed.
        let table = "transcript_id,is_PTC50nt_ref,is_PTC50nt_revise\nA, y ,yes\nB,1 , n\n";
        assert_eq!(changed(table, UnknownFlagPolicy::Changed), vec!["B"]);
    }

    #[test]
    fn unknown_counts_as_a_distinct_value_by_default() {
        assert_eq!(changed(TABLE, UnknownFlagPolicy::Changed), vec!["T1", "T3", "T5", "T7"]);
    }

    #[test]
    fn ignore_policy_requires_both_flags_known() {
        assert_eq!(changed(TABLE, UnknownFlagPolicy::Ignore), vec!["T1", "T3"]);
        assert!(!UnknownFlagPolicy::Ignore.is_changed(PtcFlag::Unknown, PtcFlag::True));
        assert!(!UnknownFlagPolicy::Changed.is_changed(PtcFlag::Unknown, PtcFlag::Unknown));
    }

    #[test]
    fn filter_is_idempotent_and_order_stable() {
        let a = changed(TABLE, UnknownFlagPolicy::Changed);
        let b = changed(TABLE, UnknownFlagPolicy::Changed);
        assert_eq!(a, b);
    }

    #[test]
    fn short_rows_and_custom_columns() {
        let table = "id,ref,rev\nA,1\nB,1,1\nC,0,1\n";
        let cols = ComparisonColumns {
            transcript_id: "id".into(),
            reference_flag: "ref".into(),
            revised_flag: "rev".into(),
        };
        let ids = read_changed(table.as_bytes(), &cols, UnknownFlagPolicy::Changed).unwrap();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn missing_flag_column_makes_every_flag_unknown() {
        let table = "transcript_id,is_PTC50nt_ref\nA,1\nB,x\n";
        assert_eq!(changed(table, UnknownFlagPolicy::Changed), vec!["A"]);
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let table = "tid,is_PTC50nt_ref,is_PTC50nt_revise\nA,1,0\n";
        let err = read_changed(table.as_bytes(), &ComparisonColumns::default(), UnknownFlagPolicy::Changed)
            .unwrap_err();
        assert!(err.to_string().contains("transcript_id"));
    }
}
