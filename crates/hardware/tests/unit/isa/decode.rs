//! # Decoder Tests
//!
//! Field extraction, immediates, control signals and illegal encodings.

use bellatrix_core::core::arch::mode::PrivilegeMode;
use bellatrix_core::core::pipeline::signals::{
    AluOp, BranchCond, CsrOp, MemWidth, MulDivOp, OpASrc, OpBSrc, SystemOp,
};
use bellatrix_core::isa::decode::{Instruction, decode};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::asm;

fn dec(raw: u32) -> Instruction {
    decode(raw, true, PrivilegeMode::Machine).expect("legal encoding")
}

// ══════════════════════════════════════════════════════════
// 1. Immediates
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(asm::addi(1, 2, -1), 0xffff_ffff)]
#[case(asm::addi(1, 2, 2047), 2047)]
#[case(asm::sw(3, 2, -4), 0xffff_fffc)]
#[case(asm::beq(1, 2, -8), 0xffff_fff8)]
#[case(asm::bne(1, 2, 4094), 4094)]
#[case(asm::jal(1, -2048), 0xffff_f800)]
#[case(asm::jal(1, 0x000f_fffe), 0x000f_fffe)]
#[case(asm::lui(1, 0xabcde), 0xabcd_e000)]
#[case(asm::auipc(1, 1), 0x1000)]
fn immediate_extraction(#[case] raw: u32, #[case] imm: u32) {
    assert_eq!(dec(raw).imm, imm);
}

// ══════════════════════════════════════════════════════════
// 2. Control signals
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(asm::add(3, 1, 2), AluOp::Add)]
#[case(asm::sub(3, 1, 2), AluOp::Sub)]
#[case(asm::sra(3, 1, 2), AluOp::Sra)]
#[case(asm::sltu(3, 1, 2), AluOp::Sltu)]
#[case(asm::and(3, 1, 2), AluOp::And)]
fn register_ops(#[case] raw: u32, #[case] op: AluOp) {
    let inst = dec(raw);
    assert_eq!(inst.ctrl.alu_op, op);
    assert_eq!(inst.ctrl.b_src, OpBSrc::Reg2);
    assert_eq!(inst.rs1_read(), Some(1));
    assert_eq!(inst.rs2_read(), Some(2));
    assert_eq!(inst.rd_write(), Some(3));
}

#[test]
fn shift_immediates() {
    assert_eq!(dec(asm::srai(1, 2, 5)).ctrl.alu_op, AluOp::Sra);
    assert_eq!(dec(asm::srli(1, 2, 5)).ctrl.alu_op, AluOp::Srl);
    assert_eq!(dec(asm::slli(1, 2, 31)).imm & 0x1f, 31);
}

#[test]
fn upper_immediates_select_operand_a() {
    assert_eq!(dec(asm::lui(1, 1)).ctrl.a_src, OpASrc::Zero);
    assert_eq!(dec(asm::auipc(1, 1)).ctrl.a_src, OpASrc::Pc);
}

#[rstest]
#[case(asm::lb(1, 2, 0), MemWidth::Byte, true)]
#[case(asm::lh(1, 2, 0), MemWidth::Half, true)]
#[case(asm::lw(1, 2, 0), MemWidth::Word, true)]
#[case(asm::lbu(1, 2, 0), MemWidth::Byte, false)]
#[case(asm::lhu(1, 2, 0), MemWidth::Half, false)]
fn loads(#[case] raw: u32, #[case] width: MemWidth, #[case] signed: bool) {
    let inst = dec(raw);
    assert!(inst.ctrl.mem_read);
    assert!(inst.ctrl.result_late());
    assert_eq!(inst.ctrl.width, width);
    assert_eq!(inst.ctrl.signed_load, signed);
}

#[test]
fn stores_read_both_sources_and_write_nothing() {
    let inst = dec(asm::sh(5, 6, 2));
    assert!(inst.ctrl.mem_write);
    assert_eq!(inst.ctrl.width, MemWidth::Half);
    assert_eq!(inst.rs1_read(), Some(6));
    assert_eq!(inst.rs2_read(), Some(5));
    assert_eq!(inst.rd_write(), None);
}

#[rstest]
#[case(asm::beq(1, 2, 8), BranchCond::Eq)]
#[case(asm::bne(1, 2, 8), BranchCond::Ne)]
#[case(asm::blt(1, 2, 8), BranchCond::Lt)]
#[case(asm::bge(1, 2, 8), BranchCond::Ge)]
#[case(asm::bltu(1, 2, 8), BranchCond::Ltu)]
#[case(asm::bgeu(1, 2, 8), BranchCond::Geu)]
fn branches(#[case] raw: u32, #[case] cond: BranchCond) {
    let inst = dec(raw);
    assert_eq!(inst.ctrl.branch, Some(cond));
    assert!(inst.ctrl.is_control());
    assert_eq!(inst.rd_write(), None);
}

#[test]
fn jumps() {
    let jal = dec(asm::jal(1, 16));
    assert!(jal.ctrl.jump && !jal.ctrl.jalr);
    assert_eq!(jal.rs1_read(), None);

    let jalr = dec(asm::jalr(1, 5, 4));
    assert!(jalr.ctrl.jump && jalr.ctrl.jalr);
    assert_eq!(jalr.rs1_read(), Some(5));
}

#[rstest]
#[case(asm::mul(1, 2, 3), MulDivOp::Mul)]
#[case(asm::mulh(1, 2, 3), MulDivOp::Mulh)]
#[case(asm::mulhsu(1, 2, 3), MulDivOp::Mulhsu)]
#[case(asm::mulhu(1, 2, 3), MulDivOp::Mulhu)]
#[case(asm::div(1, 2, 3), MulDivOp::Div)]
#[case(asm::divu(1, 2, 3), MulDivOp::Divu)]
#[case(asm::rem(1, 2, 3), MulDivOp::Rem)]
#[case(asm::remu(1, 2, 3), MulDivOp::Remu)]
fn muldiv(#[case] raw: u32, #[case] op: MulDivOp) {
    assert_eq!(dec(raw).ctrl.muldiv, Some(op));
}

#[rstest]
#[case(asm::ecall(), SystemOp::Ecall)]
#[case(asm::ebreak(), SystemOp::Ebreak)]
#[case(asm::mret(), SystemOp::Mret)]
#[case(asm::fence(), SystemOp::Fence)]
#[case(asm::fence_i(), SystemOp::FenceI)]
fn system_ops(#[case] raw: u32, #[case] op: SystemOp) {
    let inst = dec(raw);
    assert_eq!(inst.ctrl.system, op);
    assert_eq!(inst.rd_write(), None);
}

#[rstest]
#[case(asm::csrrw(1, 0x340, 2), CsrOp::Write, false, true)]
#[case(asm::csrrs(1, 0x340, 0), CsrOp::Set, false, false)]
#[case(asm::csrrs(1, 0x340, 2), CsrOp::Set, false, true)]
#[case(asm::csrrc(1, 0x340, 0), CsrOp::Clear, false, false)]
#[case(asm::csrrwi(1, 0x340, 0), CsrOp::Write, true, true)]
#[case(asm::csrrsi(1, 0x340, 0), CsrOp::Set, true, false)]
#[case(asm::csrrci(1, 0x340, 3), CsrOp::Clear, true, true)]
fn csr_instructions(
    #[case] raw: u32,
    #[case] op: CsrOp,
    #[case] imm: bool,
    #[case] writes: bool,
) {
    let inst = dec(raw);
    assert_eq!(inst.ctrl.csr_op, op);
    assert_eq!(inst.ctrl.csr_imm, imm);
    assert_eq!(inst.ctrl.csr_write, writes);
    assert_eq!(inst.csr_addr, 0x340);
    assert!(inst.ctrl.result_late());
}

#[test]
fn csr_immediate_does_not_read_rs1() {
    assert_eq!(dec(asm::csrrwi(1, 0x340, 5)).rs1_read(), None);
}

#[test]
fn x0_sources_and_destination_are_dropped() {
    let inst = dec(asm::add(0, 0, 0));
    assert_eq!(inst.rs1_read(), None);
    assert_eq!(inst.rs2_read(), None);
    assert_eq!(inst.rd_write(), None);
}

// ══════════════════════════════════════════════════════════
// 3. Illegal encodings
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0000_0000)]
#[case(0xffff_ffff)]
#[case(0x0000_1067)] // jalr with funct3 = 1
#[case(0x0000_2063)] // branch funct3 = 2
#[case(0x0000_3003)] // load funct3 = 3
#[case(0x0000_3023)] // store funct3 = 3
#[case(0x4000_1013)] // slli with funct7 = 0x20
#[case(0x4000_7033)] // and with funct7 = 0x20
#[case(0x0000_500f)] // misc-mem funct3 = 5
fn illegal_encodings(#[case] raw: u32) {
    assert!(decode(raw, true, PrivilegeMode::Machine).is_none());
}

#[test]
fn muldiv_requires_the_extension() {
    assert!(decode(asm::mul(1, 2, 3), false, PrivilegeMode::Machine).is_none());
    assert!(decode(asm::div(1, 2, 3), false, PrivilegeMode::Machine).is_none());
}

#[test]
fn mret_is_illegal_in_user_mode() {
    assert!(decode(asm::mret(), false, PrivilegeMode::User).is_none());
    assert!(decode(asm::ecall(), false, PrivilegeMode::User).is_some());
}

#[rstest]
#[case(0x1050_0073)] // wfi
#[case(0x1020_0073)] // sret
#[case(0x0000_4073)] // system funct3 = 4
fn unsupported_system_encodings(#[case] raw: u32) {
    assert!(decode(raw, true, PrivilegeMode::Machine).is_none());
}
