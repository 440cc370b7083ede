//! Start-codon context windows and the strict Kozak consensus.
//!
//! The window spans -3..+4 around the A of the start codon (8 nt), and the
//! strict consensus is `RNNATGGV` (R = A/G, V = A/C/G).

use once_cell::sync::Lazy;
use regex::Regex;

/// Bases upstream of the start codon included in the window.
pub const UPSTREAM: usize = 3;

/// Bases from the start codon's first base (inclusive) to the window end.
pub const DOWNSTREAM: usize = 5;

pub const WINDOW_LEN: usize = UPSTREAM + DOWNSTREAM;

static STRICT_KOZAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[AG]..ATGG[ACG]$").expect("strict Kozak pattern is a valid regex")
});

/// The 8-nt window around a 1-based transcript-relative start position.
///
/// `None` when there is no start, or when the start codon sits within 3 nt
/// of the 5' end or 5 nt of the 3' end of `seq`.
pub fn window(seq: &str, start: Option<u32>) -> Option<&str> {
    let start = start.filter(|&p| p > 0)? as usize;
    let i = start - 1;
    if i < UPSTREAM || i + DOWNSTREAM > seq.len() {
        return None;
    }
    seq.get(i - UPSTREAM..i + DOWNSTREAM)
}

/// Whether `window` is exactly the strict consensus `[AG]..ATGG[ACG]`.
///
/// Input is expected upper-case; a missing window never matches.
pub fn is_strict_kozak(window: Option<&str>) -> bool {
    window.is_some_and(|w| w.len() == WINDOW_LEN && STRICT_KOZAK.is_match(w))
}

/// Start position and context of one annotation's start codon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KozakCall {
    pub start: Option<u32>,
    pub window: Option<String>,
}

impl KozakCall {
    pub fn new(seq: &str, start: Option<u32>) -> Self {
        Self {
            start,
            window: window(seq, start).map(str::to_string),
        }
    }

    pub fn is_match(&self) -> bool {
        is_strict_kozak(self.window.as_deref())
    }
}
