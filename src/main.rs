use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use kozak_shift::{pipeline, report, AnnotationBuilder, AnnotationKeys, ComparisonColumns, RunConfig, UnknownFlagPolicy};

/// Kozak context of start codons for transcripts whose PTC call changed.
#[derive(Parser, Debug)]
#[command(name = "kozak-shift")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score Reference vs Revised start contexts of changed transcripts
    Changed(ChangedArgs),

    /// Write the transcript-relative CDS starts of one annotation as TSV
    Starts(StartsArgs),
}

/// Attribute key / feature type options shared by both subcommands.
#[derive(Args, Debug)]
struct KeyArgs {
    /// Attribute keys to use for transcript ID (repeatable, first present wins).
    #[arg(
        long = "transcript-id-key",
        value_name = "KEY",
        num_args = 1..,
        default_values_t = vec!["transcript_id".to_string()]
    )]
    transcript_id_keys: Vec<String>,

    /// Feature types that count as exon blocks (repeatable).
    #[arg(
        long = "exon-feature-type",
        value_name = "TYPE",
        num_args = 1..,
        default_values_t = vec!["exon".to_string()]
    )]
    exon_feature_types: Vec<String>,

    /// Feature types that count as CDS blocks (repeatable).
    #[arg(
        long = "cds-feature-type",
        value_name = "TYPE",
        num_args = 1..,
        default_values_t = vec!["CDS".to_string()]
    )]
    cds_feature_types: Vec<String>,
}

impl From<KeyArgs> for AnnotationKeys {
    fn from(args: KeyArgs) -> Self {
        AnnotationKeys {
            transcript_id_keys: args.transcript_id_keys,
            exon_feature_types: args.exon_feature_types,
            cds_feature_types: args.cds_feature_types,
        }
    }
}

#[derive(Args, Debug)]
struct ChangedArgs {
    /// CSV with per-transcript PTC flags
    #[arg(long = "compare_csv")]
    compare_csv: PathBuf,

    /// Reference annotation (.gtf or .gtf.gz)
    #[arg(long = "ref_gtf")]
    ref_gtf: PathBuf,

    /// Revised annotation (.gtf or .gtf.gz)
    #[arg(long = "rev_gtf")]
    rev_gtf: PathBuf,

    /// Transcript FASTA keyed by transcript id (.fa or .fa.gz)
    #[arg(long = "tx_fasta")]
    tx_fasta: PathBuf,

    /// Column holding transcript ids in the comparison CSV
    #[arg(long = "tx_col", default_value = "transcript_id")]
    tx_col: String,

    /// Column holding the Reference PTC flag
    #[arg(long = "ref_col", default_value = "is_PTC50nt_ref")]
    ref_col: String,

    /// Column holding the Revised PTC flag
    #[arg(long = "revise_col", default_value = "is_PTC50nt_revise")]
    revise_col: String,

    /// Output prefix; results go to <prefix>_results.csv
    #[arg(long = "out_prefix", default_value = "kozak_changed")]
    out_prefix: String,

    /// Whether a flag that is neither true nor false can make a transcript "changed"
    #[arg(long = "unknown-flags", value_enum, default_value_t = UnknownFlagPolicy::Changed)]
    unknown_flags: UnknownFlagPolicy,

    #[command(flatten)]
    keys: KeyArgs,
}

#[derive(Args, Debug)]
struct StartsArgs {
    /// Annotation (.gtf or .gtf.gz)
    #[arg(long, short)]
    gtf: PathBuf,

    /// Output TSV (transcript_id, cds_start)
    #[arg(long, short)]
    out: PathBuf,

    #[command(flatten)]
    keys: KeyArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Changed(args) => {
            let config = RunConfig {
                compare_csv: args.compare_csv,
                ref_gtf: args.ref_gtf,
                rev_gtf: args.rev_gtf,
                tx_fasta: args.tx_fasta,
                columns: ComparisonColumns {
                    transcript_id: args.tx_col,
                    reference_flag: args.ref_col,
                    revised_flag: args.revise_col,
                },
                policy: args.unknown_flags,
                keys: args.keys.into(),
                out_prefix: args.out_prefix,
            };

            let out = pipeline::run(&config)?;
            println!("Done. Results in {}", out.display());
        }

        Command::Starts(args) => {
            let builder = AnnotationBuilder {
                keys: args.keys.into(),
            };
            let idx = builder
                .build_from_path(&args.gtf)
                .with_context(|| format!("building CDS starts from {}", args.gtf.display()))?;

            println!("{idx}");

            report::write_starts_to_path(&args.out, &idx)?;

            eprintln!("CDS starts written to {}", args.out.display());
        }
    }

    Ok(())
}
