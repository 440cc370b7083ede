use crate::model::types::{ExonBlock, StartFailure};
use crate::types::{RefBlock, Strand};

/// Exon and CDS structure of one transcript within one annotation.
///
/// Blocks are kept in insertion order; every query orders them itself
/// (genomically, then strand-reversed on minus). Exons are never merged, so
/// the layout is the plain cumulative length of the blocks as annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptModel {
    pub name: String,
    pub strand: Strand,
    exons: Vec<RefBlock>,
    cds: Vec<RefBlock>,
}

impl TranscriptModel {
    pub fn new(name: impl Into<String>, strand: Strand) -> Self {
        Self {
            name: name.into(),
            strand,
            exons: Vec::new(),
            cds: Vec::new(),
        }
    }

    pub fn add_exon(&mut self, block: RefBlock) {
        self.exons.push(block);
    }

    pub fn add_cds(&mut self, block: RefBlock) {
        self.cds.push(block);
    }

    pub fn exons(&self) -> &[RefBlock] {
        &self.exons
    }

    pub fn cds(&self) -> &[RefBlock] {
        &self.cds
    }

    pub fn has_cds(&self) -> bool {
        !self.cds.is_empty()
    }

    /// Spliced length of the transcript.
    pub fn tx_len(&self) -> u32 {
        self.exons.iter().map(|b| b.len()).sum()
    }

    /// Exons in 5' -> 3' transcript order with their transcript-relative spans.
    pub fn exon_layout(&self) -> Vec<ExonBlock> {
        let mut tpos = 0u32;
        RefBlock::order_for_strand(&self.exons, self.strand)
            .into_iter()
            .map(|genomic| {
                let block = ExonBlock {
                    genomic,
                    tx_start: tpos + 1,
                    tx_end: tpos + genomic.len(),
                };
                tpos += genomic.len();
                block
            })
            .collect()
    }

    /// Map a 0-based genomic position to a 1-based position in the spliced
    /// transcript. `None` if the position is in no exon.
    ///
    /// Exons are scanned in transcript order and the first one containing
    /// `pos0` wins.
    pub fn genomic_to_tx(&self, pos0: u32) -> Option<u32> {
        self.exon_layout().into_iter().find_map(|ex| {
            if !ex.genomic.contains_pos(pos0) {
                return None;
            }
            let offset = if self.strand.is_reverse() {
                ex.genomic.last() - pos0
            } else {
                pos0 - ex.genomic.start
            };
            Some(ex.tx_start + offset)
        })
    }

    /// Genomic position (0-based) of the first coding base: the lower bound
    /// of the 5'-most CDS block on plus, its last base on minus.
    pub fn cds_start_genomic(&self) -> Option<u32> {
        let first = *RefBlock::order_for_strand(&self.cds, self.strand).first()?;
        Some(if self.strand.is_reverse() {
            first.last()
        } else {
            first.start
        })
    }

    /// 1-based transcript-relative position of the first coding base.
    pub fn cds_start_tx(&self) -> Result<u32, StartFailure> {
        let g = self.cds_start_genomic().ok_or(StartFailure::NoCds)?;
        if self.exons.is_empty() {
            return Err(StartFailure::NoExons);
        }
        self.genomic_to_tx(g).ok_or(StartFailure::OutsideExons)
    }
}
