//! # CSR File Tests
//!
//! Reset values, implemented set per configuration, access rules and WARL masks.

use bellatrix_core::config::Config;
use bellatrix_core::core::arch::csr::{self, Csrs};
use bellatrix_core::core::arch::mode::PrivilegeMode;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn full_config() -> Config {
    let mut config = Config::default();
    config.isa.enable_rv32m = true;
    config.isa.enable_extra_csr = true;
    config.isa.enable_user_mode = true;
    config.trigger.enable = true;
    config
}

// ══════════════════════════════════════════════════════════
// 1. Reset state
// ══════════════════════════════════════════════════════════

#[test]
fn reset_values() {
    let csrs = Csrs::new(&Config::default());
    assert_eq!(csrs.read(csr::MTVEC), Some(0x8000_0000));
    assert_eq!(csrs.read(csr::MIE), Some(0));
    assert_eq!(csrs.read(csr::MEPC), Some(0));
    assert_eq!(csrs.mpp(), PrivilegeMode::Machine);
    assert_eq!(csrs.mstatus & csr::MSTATUS_MIE, 0);
}

#[test]
fn misa_reports_extensions() {
    let csrs = Csrs::new(&full_config());
    let misa = csrs.read(csr::MISA).unwrap();
    assert_eq!(misa & csr::MISA_MXL_32, csr::MISA_MXL_32);
    assert_ne!(misa & csr::MISA_EXT_I, 0);
    assert_ne!(misa & csr::MISA_EXT_M, 0);
    assert_ne!(misa & csr::MISA_EXT_U, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Implemented set
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(csr::MSTATUS, true)]
#[case(csr::MTVEC, true)]
#[case(csr::MIP, true)]
#[case(csr::MISA, false)]
#[case(csr::MCYCLE, false)]
#[case(csr::CYCLE, false)]
#[case(csr::TSELECT, false)]
#[case(0x7C0, false)]
fn minimal_core_csr_set(#[case] addr: u32, #[case] implemented: bool) {
    let csrs = Csrs::new(&Config::default());
    assert_eq!(csrs.is_implemented(addr), implemented);
    assert_eq!(csrs.read(addr).is_some(), implemented);
}

#[rstest]
#[case(csr::MISA)]
#[case(csr::MHARTID)]
#[case(csr::MCYCLEH)]
#[case(csr::INSTRET)]
#[case(csr::TDATA2)]
fn full_core_csr_set(#[case] addr: u32) {
    assert!(Csrs::new(&full_config()).is_implemented(addr));
}

#[test]
fn user_counters_need_user_mode() {
    let mut config = Config::default();
    config.isa.enable_extra_csr = true;
    let csrs = Csrs::new(&config);
    assert!(csrs.is_implemented(csr::MCYCLE));
    assert!(!csrs.is_implemented(csr::CYCLE));
}

// ══════════════════════════════════════════════════════════
// 3. Access checks
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(csr::MSCRATCH, false, PrivilegeMode::Machine, true)]
#[case(csr::MSCRATCH, true, PrivilegeMode::Machine, true)]
#[case(csr::MSCRATCH, false, PrivilegeMode::User, false)]
#[case(csr::CYCLE, false, PrivilegeMode::User, true)]
#[case(csr::CYCLE, true, PrivilegeMode::Machine, false)]
#[case(csr::MHARTID, true, PrivilegeMode::Machine, false)]
#[case(0x7C0, false, PrivilegeMode::Machine, false)]
fn access_rules(
    #[case] addr: u32,
    #[case] write: bool,
    #[case] privilege: PrivilegeMode,
    #[case] allowed: bool,
) {
    let csrs = Csrs::new(&full_config());
    assert_eq!(csrs.check_access(addr, write, privilege), allowed);
}

// ══════════════════════════════════════════════════════════
// 4. WARL behaviour
// ══════════════════════════════════════════════════════════

#[test]
fn mstatus_keeps_only_legal_fields() {
    let mut csrs = Csrs::new(&Config::default());
    csrs.write(csr::MSTATUS, 0xffff_ffff);
    assert_eq!(
        csrs.read(csr::MSTATUS),
        Some(csr::MSTATUS_MIE | csr::MSTATUS_MPIE | csr::MSTATUS_MPP)
    );
}

#[test]
fn mpp_user_is_illegal_without_user_mode() {
    let mut csrs = Csrs::new(&Config::default());
    csrs.write(csr::MSTATUS, 0);
    assert_eq!(csrs.mpp(), PrivilegeMode::Machine);
    csrs.set_mpp(PrivilegeMode::User);
    assert_eq!(csrs.mpp(), PrivilegeMode::Machine);
}

#[test]
fn mpp_user_is_legal_with_user_mode() {
    let mut csrs = Csrs::new(&full_config());
    csrs.write(csr::MSTATUS, 0);
    assert_eq!(csrs.mpp(), PrivilegeMode::User);
}

#[rstest]
#[case(csr::MTVEC, 0x8000_0103, 0x8000_0100)]
#[case(csr::MEPC, 0x8000_0002, 0x8000_0000)]
#[case(csr::MIE, 0xffff_ffff, csr::INTERRUPT_MASK)]
#[case(csr::MSCRATCH, 0xffff_ffff, 0xffff_ffff)]
#[case(csr::MCAUSE, 0x8000_0007, 0x8000_0007)]
fn warl_masks(#[case] addr: u32, #[case] val: u32, #[case] expected: u32) {
    let mut csrs = Csrs::new(&Config::default());
    csrs.write(addr, val);
    assert_eq!(csrs.read(addr), Some(expected));
}

#[test]
fn mip_is_not_writable() {
    let mut csrs = Csrs::new(&Config::default());
    csrs.write(csr::MIP, 0xffff_ffff);
    assert_eq!(csrs.read(csr::MIP), Some(0));
}

#[test]
fn counter_halves() {
    let mut csrs = Csrs::new(&full_config());
    csrs.write(csr::MCYCLEH, 0x1);
    csrs.write(csr::MCYCLE, 0x2);
    assert_eq!(csrs.mcycle, 0x1_0000_0002);
    assert_eq!(csrs.read(csr::CYCLEH), Some(1));
    assert_eq!(csrs.read(csr::CYCLE), Some(2));
}
