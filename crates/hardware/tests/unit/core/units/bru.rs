//! # Branch Predictor Tests

use bellatrix_core::config::PredictorConfig;
use bellatrix_core::core::units::bru::last_outcome::LastOutcomePredictor;
use bellatrix_core::core::units::bru::static_bp::StaticPredictor;
use bellatrix_core::core::units::bru::{BranchPredictor, BranchPredictorWrapper, Prediction};
use pretty_assertions::assert_eq;

const NOT_TAKEN: Prediction = Prediction {
    taken: false,
    target: 0,
};

// ══════════════════════════════════════════════════════════
// 1. Static predictor
// ══════════════════════════════════════════════════════════

#[test]
fn static_always_not_taken() {
    let mut bp = StaticPredictor;
    bp.update(0x100, true, 0x200);
    assert_eq!(bp.predict(0x100), NOT_TAKEN);
}

// ══════════════════════════════════════════════════════════
// 2. Last-outcome predictor
// ══════════════════════════════════════════════════════════

#[test]
fn cold_table_predicts_not_taken() {
    let bp = LastOutcomePredictor::new(16);
    assert_eq!(bp.predict(0x8000_0000), NOT_TAKEN);
}

#[test]
fn remembers_last_taken_outcome() {
    let mut bp = LastOutcomePredictor::new(16);
    bp.update(0x8000_0010, true, 0x8000_0040);
    assert_eq!(
        bp.predict(0x8000_0010),
        Prediction {
            taken: true,
            target: 0x8000_0040
        }
    );
    bp.update(0x8000_0010, false, 0x8000_0040);
    assert_eq!(bp.predict(0x8000_0010), NOT_TAKEN);
}

#[test]
fn aliasing_pcs_share_an_entry() {
    let mut bp = LastOutcomePredictor::new(4);
    bp.update(0x0, true, 0x80);
    // 0x10 >> 2 = 4, which wraps to index 0 in a 4-entry table.
    assert!(bp.predict(0x10).taken);
    assert!(!bp.predict(0x4).taken);
}

// ══════════════════════════════════════════════════════════
// 3. Configuration selection
// ══════════════════════════════════════════════════════════

#[test]
fn wrapper_follows_config() {
    let disabled = BranchPredictorWrapper::new(&PredictorConfig::default());
    assert!(matches!(disabled, BranchPredictorWrapper::Static(_)));

    let mut enabled = BranchPredictorWrapper::new(&PredictorConfig {
        enable: true,
        size: 8,
    });
    enabled.update(0x20, true, 0x40);
    assert!(enabled.predict(0x20).taken);
}
