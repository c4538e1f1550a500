//! # Hardware Trigger Tests

use bellatrix_core::common::Trap;
use bellatrix_core::core::arch::mode::PrivilegeMode;
use bellatrix_core::core::units::trigger::{
    MCONTROL_EXECUTE, MCONTROL_LOAD, MCONTROL_M, MCONTROL_STORE, MCONTROL_U, MatchKind,
    TYPE_MATCH, TriggerModule,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn armed(control: u32, addr: u32) -> TriggerModule {
    let mut t = TriggerModule::new(2, true);
    t.set_tselect(1);
    t.set_tdata1(control);
    t.set_tdata2(addr);
    t
}

#[test]
fn tdata1_reports_match_type() {
    let t = TriggerModule::new(4, false);
    assert_eq!(t.len(), 4);
    assert_eq!(t.tdata1() >> 28, TYPE_MATCH);
}

#[test]
fn tselect_ignores_out_of_range() {
    let mut t = TriggerModule::new(2, false);
    t.set_tselect(1);
    t.set_tselect(5);
    assert_eq!(t.tselect(), 1);
}

#[test]
fn u_bit_needs_user_mode() {
    let mut t = TriggerModule::new(1, false);
    t.set_tdata1(MCONTROL_U | MCONTROL_M);
    assert_eq!(t.tdata1() & MCONTROL_U, 0);
    assert_ne!(t.tdata1() & MCONTROL_M, 0);
}

#[rstest]
#[case(MatchKind::Execute, MCONTROL_EXECUTE)]
#[case(MatchKind::Load, MCONTROL_LOAD)]
#[case(MatchKind::Store, MCONTROL_STORE)]
fn hit_raises_breakpoint(#[case] kind: MatchKind, #[case] bit: u32) {
    let t = armed(MCONTROL_M | bit, 0x8000_0040);
    assert_eq!(
        t.check(kind, 0x8000_0040, PrivilegeMode::Machine),
        Some(Trap::Breakpoint(0x8000_0040))
    );
    assert_eq!(t.check(kind, 0x8000_0044, PrivilegeMode::Machine), None);
}

#[test]
fn kind_must_be_enabled() {
    let t = armed(MCONTROL_M | MCONTROL_LOAD, 0x100);
    assert_eq!(t.check(MatchKind::Store, 0x100, PrivilegeMode::Machine), None);
    assert_eq!(t.check(MatchKind::Execute, 0x100, PrivilegeMode::Machine), None);
}

#[test]
fn privilege_filter() {
    let t = armed(MCONTROL_U | MCONTROL_EXECUTE, 0x100);
    assert!(t.check(MatchKind::Execute, 0x100, PrivilegeMode::User).is_some());
    assert!(t.check(MatchKind::Execute, 0x100, PrivilegeMode::Machine).is_none());
}

#[test]
fn debug_mode_action_is_ignored() {
    let t = armed(MCONTROL_M | MCONTROL_EXECUTE | (1 << 12), 0x100);
    assert_eq!(t.check(MatchKind::Execute, 0x100, PrivilegeMode::Machine), None);
}
