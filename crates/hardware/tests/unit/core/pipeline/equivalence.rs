//! # Pipeline vs. Sequential Reference
//!
//! Random straight-line and forward-branching programs are run on the pipeline and on
//! the reference interpreter. Whatever the configuration, the register file after the
//! same number of retired instructions must be identical.

use bellatrix_core::config::Config;
use proptest::prelude::*;

use crate::common::builder::asm;
use crate::common::harness::{DATA_BASE, RAM_BASE, TestContext};
use crate::common::reference::Reference;

/// Base register for all memory accesses; never a destination.
const BASE_REG: u32 = 31;
/// First register of the data-area dump.
const DUMP_REG: u32 = 9;
/// Words of the data area dumped into registers before halting.
const DUMP_WORDS: u32 = 16;

type RType = fn(u32, u32, u32) -> u32;
type IType = fn(u32, u32, i32) -> u32;
type ShiftType = fn(u32, u32, u32) -> u32;

const R_OPS: [RType; 10] = [
    asm::add,
    asm::sub,
    asm::sll,
    asm::slt,
    asm::sltu,
    asm::xor,
    asm::srl,
    asm::sra,
    asm::or,
    asm::and,
];

const I_OPS: [IType; 6] = [
    asm::addi,
    asm::slti,
    asm::sltiu,
    asm::xori,
    asm::ori,
    asm::andi,
];

const SHIFT_OPS: [ShiftType; 3] = [asm::slli, asm::srli, asm::srai];

const M_OPS: [RType; 8] = [
    asm::mul,
    asm::mulh,
    asm::mulhsu,
    asm::mulhu,
    asm::div,
    asm::divu,
    asm::rem,
    asm::remu,
];

/// Loads with the offset mask that keeps them aligned.
const LOADS: [(IType, i32); 5] = [
    (asm::lw, !3),
    (asm::lh, !1),
    (asm::lhu, !1),
    (asm::lb, !0),
    (asm::lbu, !0),
];

const STORES: [(IType, i32); 3] = [(asm::sw, !3), (asm::sh, !1), (asm::sb, !0)];

fn dst() -> impl Strategy<Value = u32> {
    1u32..=8
}

fn src() -> impl Strategy<Value = u32> {
    0u32..=8
}

fn forward() -> impl Strategy<Value = i32> {
    prop_oneof![Just(8), Just(12)]
}

fn branch(kind: usize, rs1: u32, rs2: u32, off: i32) -> u32 {
    match kind {
        0 => asm::beq(rs1, rs2, off),
        1 => asm::bne(rs1, rs2, off),
        2 => asm::blt(rs1, rs2, off),
        3 => asm::bge(rs1, rs2, off),
        4 => asm::bltu(rs1, rs2, off),
        _ => asm::bgeu(rs1, rs2, off),
    }
}

/// One random instruction that stays inside the program and the data area.
fn instruction() -> impl Strategy<Value = u32> {
    prop_oneof![
        4 => (dst(), src(), src(), 0..R_OPS.len())
            .prop_map(|(rd, a, b, k)| R_OPS[k](rd, a, b)),
        3 => (dst(), src(), -2048i32..2048, 0..I_OPS.len())
            .prop_map(|(rd, a, imm, k)| I_OPS[k](rd, a, imm)),
        1 => (dst(), src(), 0u32..32, 0..SHIFT_OPS.len())
            .prop_map(|(rd, a, sh, k)| SHIFT_OPS[k](rd, a, sh)),
        1 => (dst(), 0u32..0x10_0000, any::<bool>())
            .prop_map(|(rd, imm, pc_rel)| if pc_rel { asm::auipc(rd, imm) } else { asm::lui(rd, imm) }),
        2 => (dst(), src(), src(), 0..M_OPS.len())
            .prop_map(|(rd, a, b, k)| M_OPS[k](rd, a, b)),
        3 => (dst(), 0i32..64, 0..LOADS.len())
            .prop_map(|(rd, off, k)| (LOADS[k].0)(rd, BASE_REG, off & LOADS[k].1)),
        3 => (src(), 0i32..64, 0..STORES.len())
            .prop_map(|(rs, off, k)| (STORES[k].0)(rs, BASE_REG, off & STORES[k].1)),
        2 => (src(), src(), 0usize..6, forward())
            .prop_map(|(a, b, kind, off)| branch(kind, a, b, off)),
        1 => (dst(), forward()).prop_map(|(rd, off)| asm::jal(rd, off)),
    ]
}

/// Seeds `x1..=x8`, points the base register at the data area, runs `body`, then dumps
/// the data area into registers and halts.
fn build(seeds: [u32; 8], body: &[u32]) -> Vec<u32> {
    let mut words = Vec::new();
    for (r, value) in (1u32..).zip(seeds) {
        words.extend(asm::li(r, value));
    }
    words.push(asm::lui(BASE_REG, DATA_BASE >> 12));
    words.extend_from_slice(body);
    // Landing pad for forward branches at the end of the body.
    words.extend([asm::nop(), asm::nop()]);
    for i in 0..DUMP_WORDS {
        words.push(asm::lw(DUMP_REG + i, BASE_REG, (4 * i) as i32));
    }
    words.push(asm::halt());
    words
}

fn check(config: Config, wait_states: u32, program: &[u32]) -> Result<(), TestCaseError> {
    let mut reference = Reference::new(RAM_BASE);
    reference.load(RAM_BASE, program);
    let retired = reference.run(10_000);

    let mut ctx = TestContext::with_wait_states(config, wait_states).load_program(program);
    let _ = ctx.run_until_retired(retired);
    prop_assert_eq!(ctx.sim.stats().exceptions, 0);
    prop_assert_eq!(ctx.regs(), reference.regs);
    Ok(())
}

fn rv32m() -> Config {
    let mut config = Config::default();
    config.isa.enable_rv32m = true;
    config
}

fn fast_path() -> Config {
    let mut config = rv32m();
    config.icache.enable = true;
    config.dcache.enable = true;
    config.predictor.enable = true;
    config
}

fn small_caches() -> Config {
    let mut config = fast_path();
    config.icache.nlines = 2;
    config.icache.nwords = 4;
    config.dcache.nlines = 2;
    config.dcache.nwords = 4;
    config.dcache.nways = 2;
    config.predictor.size = 2;
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn uncached_pipeline_matches_reference(
        seeds in prop::array::uniform8(any::<u32>()),
        body in prop::collection::vec(instruction(), 1..48),
    ) {
        check(rv32m(), 0, &build(seeds, &body))?;
    }

    #[test]
    fn cached_predicted_pipeline_matches_reference(
        seeds in prop::array::uniform8(any::<u32>()),
        body in prop::collection::vec(instruction(), 1..48),
    ) {
        check(fast_path(), 0, &build(seeds, &body))?;
    }

    #[test]
    fn thrashing_caches_with_wait_states_match_reference(
        seeds in prop::array::uniform8(any::<u32>()),
        body in prop::collection::vec(instruction(), 1..48),
    ) {
        check(small_caches(), 2, &build(seeds, &body))?;
    }
}
