//! kozak_shift
//!
//! Finds transcripts whose PTC call changed between a Reference and a Revised
//! annotation, maps each annotation's CDS start onto the spliced transcript
//! and scores the start-codon context against the strict Kozak consensus.
//! Genomic blocks are 0-based, half-open; transcript positions are 1-based.

pub mod types;
pub mod model;
pub mod annotation;
pub mod index;
pub mod sequence;
pub mod compare;
pub mod kozak;
pub mod report;
pub mod pipeline;

pub use index::{AnnotationKeys, CdsStartIndex, IndexStats};

pub use annotation::AnnotationBuilder;

pub use types::{RefBlock, Strand};

pub use model::transcript::TranscriptModel;
pub use model::{ExonBlock, StartFailure};

pub use compare::{ComparisonColumns, PtcFlag, UnknownFlagPolicy};
pub use kozak::KozakCall;
pub use pipeline::{KozakComparison, RunConfig};
pub use report::ResultRow;
pub use sequence::SequenceTable;
