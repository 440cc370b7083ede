use std::fs;
use std::path::Path;

use kozak_shift::pipeline::{run, RunConfig};
use kozak_shift::{AnnotationKeys, ComparisonColumns, UnknownFlagPolicy};

// Spliced transcript TX_PLUS (two exons, 20 + 20 nt):
//   exon1 chr1:1001-1020  CCCCCCCCCCCCCCCCCAGG
//   exon2 chr1:1101-1120  ATGGCCCCTGGATGGTCCCC
// Reference CDS starts at chr1:1101 (tx 21, context AGG|ATGGC => strong),
// Revised CDS starts at chr1:1112 (tx 32, context TGG|ATGGT => weak).
const TX_PLUS: &str = "CCCCCCCCCCCCCCCCCAGGATGGCCCCTGGATGGTCCCC";

// TX_MINUS: one exon chr2:501-540 on the minus strand.
// Reference CDS ends at chr2:533 (tx 8); the Revised CDS lies outside the exon.
const TX_MINUS: &str = "CCCCGCCATGGACCCCCCCCCCCCCCCCCCCCCCCCCCCC";

const REF_GTF: &str = "\
#!genome-build test
chr1\tref\ttranscript\t1001\t1120\t.\t+\t.\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr1\tref\texon\t1001\t1020\t.\t+\t.\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr1\tref\texon\t1101\t1120\t.\t+\t.\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr1\tref\tCDS\t1101\t1120\t.\t+\t0\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr2\tref\texon\t501\t540\t.\t-\t.\tgene_id \"G2\"; transcript_id \"TX_MINUS\";
chr2\tref\tCDS\t501\t533\t.\t-\t0\tgene_id \"G2\"; transcript_id \"TX_MINUS\";
chr2\tref\texon\t601\t640\t.\t+\t.\tgene_id \"G3\"; transcript_id \"NOSEQ\";
chr2\tref\tCDS\t611\t640\t.\t+\t0\tgene_id \"G3\"; transcript_id \"NOSEQ\";
";

const REV_GTF: &str = "\
chr1\trev\texon\t1001\t1020\t.\t+\t.\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr1\trev\texon\t1101\t1120\t.\t+\t.\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr1\trev\tCDS\t1112\t1120\t.\t+\t0\tgene_id \"G1\"; transcript_id \"TX_PLUS\";
chr2\trev\texon\t501\t540\t.\t-\t.\tgene_id \"G2\"; transcript_id \"TX_MINUS\";
chr2\trev\tCDS\t301\t480\t.\t-\t0\tgene_id \"G2\"; transcript_id \"TX_MINUS\";
";

const COMPARE: &str = "\
transcript_id,is_PTC50nt_ref,is_PTC50nt_revise
UNCHANGED,False,False
TX_MINUS,yes,no
NOSEQ,1,0
TX_PLUS,False,True
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let p = dir.join(name);
    fs::write(&p, content).unwrap();
    p
}

#[test]
fn full_run_writes_one_row_per_changed_transcript_with_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let fasta = format!(">TX_PLUS desc\n{}\n{}\n>TX_MINUS\n{}\n>UNCHANGED\nACGT\n", &TX_PLUS[..20], &TX_PLUS[20..], TX_MINUS.to_lowercase());

    let config = RunConfig {
        compare_csv: write(dir.path(), "compare.csv", COMPARE),
        ref_gtf: write(dir.path(), "ref.gtf", REF_GTF),
        rev_gtf: write(dir.path(), "rev.gtf", REV_GTF),
        tx_fasta: write(dir.path(), "tx.fa", &fasta),
        columns: ComparisonColumns::default(),
        policy: UnknownFlagPolicy::Changed,
        keys: AnnotationKeys::default(),
        out_prefix: dir.path().join("run").display().to_string(),
    };

    let out = run(&config).unwrap();
    assert_eq!(out, dir.path().join("run_results.csv"));

    let text = fs::read_to_string(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "transcript_id,ref_start,ref_8mer,ref_kozak,rev_start,rev_8mer,rev_kozak",
            "TX_MINUS,8,GCCATGGA,true,NA,NA,false",
            "TX_PLUS,21,AGGATGGC,true,32,TGGATGGT,false",
        ]
    );
}

#[test]
fn missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        compare_csv: write(dir.path(), "compare.csv", COMPARE),
        ref_gtf: dir.path().join("absent.gtf"),
        rev_gtf: write(dir.path(), "rev.gtf", REV_GTF),
        tx_fasta: write(dir.path(), "tx.fa", ">TX_PLUS\nACGT\n"),
        columns: ComparisonColumns::default(),
        policy: UnknownFlagPolicy::Changed,
        keys: AnnotationKeys::default(),
        out_prefix: dir.path().join("run").display().to_string(),
    };

    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("absent.gtf"));
    assert!(!dir.path().join("run_results.csv").exists());
}
