use bellatrix_core::common::{ConfigError, LoadError};
use bellatrix_core::config::Config;
use bellatrix_core::sim::Simulator;
use bellatrix_core::soc::{Interconnect, Ram};
use pretty_assertions::assert_eq;

use crate::common::builder::asm;
use crate::common::harness::{RAM_BASE, RAM_WIDTH, TestContext, to_bytes};

fn bus() -> Interconnect {
    let mut bus = Interconnect::new();
    bus.attach(RAM_BASE, RAM_WIDTH, Box::new(Ram::new("ram", 1 << RAM_WIDTH, 0)));
    bus
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = Config::default();
    config.core.reset_address = RAM_BASE + 2;
    let err = Simulator::new(&config, bus()).expect_err("misaligned reset");
    assert!(matches!(err, ConfigError::MisalignedResetAddress(a) if a == RAM_BASE + 2));
}

#[test]
fn load_image_errors() {
    let mut sim = Simulator::new(&Config::default(), bus()).expect("valid");
    assert!(matches!(
        sim.load_image(0x1000_0000, &[0; 4]),
        Err(LoadError::Unmapped(0x1000_0000))
    ));
    assert!(matches!(
        sim.load_image(RAM_BASE + 0xfffc, &[0; 8]),
        Err(LoadError::OutOfRange { len: 8, .. })
    ));
}

#[test]
fn run_advances_exactly_that_many_cycles() {
    let mut ctx = TestContext::new().load_program(&[asm::halt()]);
    ctx.run(17);
    assert_eq!(ctx.sim.stats().cycles, 17);
    assert_eq!(ctx.csrs().mcycle, 17);
}

#[test]
fn run_until_checks_before_ticking() {
    let mut ctx = TestContext::new().load_program(&[asm::halt()]);
    assert_eq!(ctx.sim.run_until(|_| true, 10), Some(0));
    assert_eq!(ctx.sim.stats().cycles, 0);
}

#[test]
fn run_until_gives_up_at_the_limit() {
    let mut ctx = TestContext::new().load_program(&[asm::halt()]);
    assert_eq!(ctx.sim.run_until(|cpu| cpu.regs.read(1) == 1, 50), None);
    assert_eq!(ctx.sim.stats().cycles, 50);
}

#[test]
fn reset_restarts_the_program() {
    let program = [asm::addi(1, 1, 1), asm::halt()];
    let mut sim = Simulator::new(&Config::default(), bus()).expect("valid");
    sim.load_image(RAM_BASE, &to_bytes(&program)).expect("fits");
    let _ = sim.run_until(|cpu| cpu.stats.instructions_retired == 1, 1_000);
    assert_eq!(sim.cpu.regs.read(1), 1);

    sim.cpu.reset();
    assert_eq!(sim.cpu.pc, RAM_BASE);
    assert!(sim.cpu.pipeline_empty());
    assert_eq!(sim.stats().cycles, 0);
    assert_eq!(sim.cpu.regs.read(1), 0);

    let _ = sim.run_until(|cpu| cpu.stats.instructions_retired == 1, 1_000);
    assert_eq!(sim.cpu.regs.read(1), 1);
}

#[test]
fn halted_core_keeps_spinning_without_side_effects() {
    let mut ctx = TestContext::new().load_program(&[asm::addi(1, 0, 5), asm::halt()]);
    ctx.run(200);
    let stats = ctx.sim.stats();
    assert_eq!(ctx.reg(1), 5);
    assert_eq!(stats.traps_taken(), 0);
    assert!(stats.instructions_retired > 2);
    assert!(stats.ipc() > 0.0 && stats.ipc() < 1.0);
}

#[test]
fn dump_state_lists_pc_and_registers() {
    let mut ctx = TestContext::new().load_program(&[asm::addi(3, 0, 0x7f), asm::halt()]);
    let _ = ctx.run_until_retired(1);
    let dump = ctx.cpu().dump_state();
    assert!(dump.starts_with("pc = 0x8000"));
    assert!(dump.contains("x3 =0x0000007f"));
}
