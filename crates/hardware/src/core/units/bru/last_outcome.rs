//! Last-Outcome Predictor.
//!
//! A direct-mapped table indexed by `pc[2 +: log2(size)]`. Each entry remembers whether
//! the last branch or jump mapping to it was taken and where it went. There is no tag:
//! aliasing instructions share an entry, and a non-control instruction that hits a
//! taken entry is corrected in Execute.

use super::{BranchPredictor, Prediction};

/// An entry in the history table.
#[derive(Clone, Copy, Debug, Default)]
struct Entry {
    valid: bool,
    taken: bool,
    target: u32,
}

/// Single-bit history table.
#[derive(Clone, Debug)]
pub struct LastOutcomePredictor {
    table: Vec<Entry>,
    mask: usize,
}

impl LastOutcomePredictor {
    /// Creates a table of `size` invalid entries.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of entries. Must be a power of two.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            table: vec![Entry::default(); size],
            mask: size - 1,
        }
    }

    fn index(&self, pc: u32) -> usize {
        ((pc >> 2) as usize) & self.mask
    }
}

impl BranchPredictor for LastOutcomePredictor {
    /// Returns the stored outcome if the entry is valid and was taken.
    fn predict(&self, pc: u32) -> Prediction {
        match self.table.get(self.index(pc)) {
            Some(e) if e.valid && e.taken => Prediction {
                taken: true,
                target: e.target,
            },
            _ => Prediction::default(),
        }
    }

    /// Overwrites the entry with the resolved outcome.
    fn update(&mut self, pc: u32, taken: bool, target: u32) {
        let idx = self.index(pc);
        if let Some(e) = self.table.get_mut(idx) {
            *e = Entry {
                valid: true,
                taken,
                target,
            };
        }
    }
}
