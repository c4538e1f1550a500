//! Branch prediction unit (BRU).
//!
//! The Fetch-Address stage asks the predictor for the next fetch address; Execute
//! trains it with every resolved branch and jump. Two implementations exist:
//! a single-bit "last outcome" table and the static not-taken fallback used when
//! prediction is disabled.

/// Single-bit last-outcome predictor table.
pub mod last_outcome;

/// Static branch predictor (always not-taken).
pub mod static_bp;

use self::{last_outcome::LastOutcomePredictor, static_bp::StaticPredictor};
use crate::config::PredictorConfig;

/// A prediction made in the Fetch-Address stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// The instruction is predicted to redirect fetch.
    pub taken: bool,
    /// Predicted target (meaningful when `taken`).
    pub target: u32,
}

/// Interface shared by all branch predictors.
pub trait BranchPredictor {
    /// Predicts the control flow of the instruction at `pc`.
    fn predict(&self, pc: u32) -> Prediction;

    /// Records the resolved outcome of the branch or jump at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the resolved instruction.
    /// * `taken` - Whether it redirected control flow.
    /// * `target` - The resolved target address.
    fn update(&mut self, pc: u32, taken: bool, target: u32);
}

/// Enum wrapper for static dispatch of branch predictors.
#[derive(Clone, Debug)]
pub enum BranchPredictorWrapper {
    /// Always not-taken.
    Static(StaticPredictor),
    /// Single-bit history table.
    LastOutcome(LastOutcomePredictor),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by the configuration.
    pub fn new(config: &PredictorConfig) -> Self {
        if config.enable {
            Self::LastOutcome(LastOutcomePredictor::new(config.size))
        } else {
            Self::Static(StaticPredictor)
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline]
    fn predict(&self, pc: u32) -> Prediction {
        match self {
            Self::Static(bp) => bp.predict(pc),
            Self::LastOutcome(bp) => bp.predict(pc),
        }
    }

    #[inline]
    fn update(&mut self, pc: u32, taken: bool, target: u32) {
        match self {
            Self::Static(bp) => bp.update(pc, taken, target),
            Self::LastOutcome(bp) => bp.update(pc, taken, target),
        }
    }
}
