/// Genomic strand/orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    /// True if blocks must be walked from the highest genomic coordinate down.
    ///
    /// "Unknown" is laid out like plus.
    #[inline]
    pub fn is_reverse(self) -> bool {
        self == Strand::Minus
    }
}

/// A contiguous genomic interval.
/// Coordinates are 0-based, half-open: [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefBlock {
    pub start: u32,
    pub end: u32,
}

impl RefBlock {
    /// Create a new block. Panics if start >= end.
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start < end, "RefBlock requires start < end");
        Self { start, end }
    }

    /// Build a block from 1-based inclusive GTF coordinates.
    pub fn from_one_based(start1: u32, end1: u32) -> Self {
        Self::new(start1 - 1, end1)
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// Last base covered by the block (0-based, inclusive).
    #[inline]
    pub fn last(self) -> u32 {
        self.end - 1
    }

    #[inline]
    pub fn contains_pos(self, pos0: u32) -> bool {
        self.start <= pos0 && pos0 < self.end
    }

    /// Sort blocks genomically and, for reverse strands, flip them so the
    /// result runs 5' -> 3' along the transcript.
    pub fn order_for_strand(blocks: &[RefBlock], strand: Strand) -> Vec<RefBlock> {
        let mut out = blocks.to_vec();
        out.sort_by_key(|b| (b.start, b.end));
        if strand.is_reverse() {
            out.reverse();
        }
        out
    }
}
