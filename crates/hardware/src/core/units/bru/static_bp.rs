//! Static Branch Predictor.
//!
//! Predicts every instruction as not taken, so fetch always proceeds sequentially and
//! every taken branch or jump is recovered in Execute.

use super::{BranchPredictor, Prediction};

/// Static "always not taken" predictor.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPredictor;

impl BranchPredictor for StaticPredictor {
    fn predict(&self, _pc: u32) -> Prediction {
        Prediction::default()
    }

    fn update(&mut self, _pc: u32, _taken: bool, _target: u32) {}
}
