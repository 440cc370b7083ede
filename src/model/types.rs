use crate::types::RefBlock;

/// An exon placed on both coordinate systems.
///
/// - `genomic` is 0-based, half-open (same as [`RefBlock`])
/// - `tx_start`/`tx_end` are 1-based, inclusive positions in the spliced
///   transcript; consecutive blocks of a layout are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExonBlock {
    pub genomic: RefBlock,
    pub tx_start: u32,
    pub tx_end: u32,
}

impl ExonBlock {
    #[inline]
    pub fn len(&self) -> u32 {
        self.genomic.len()
    }
}

/// Why a transcript did not get a transcript-relative CDS start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartFailure {
    /// The transcript carries no CDS feature.
    NoCds,

    /// CDS blocks exist but no exon blocks to splice against.
    NoExons,

    /// The 5' CDS boundary lies outside every exon.
    OutsideExons,
}
