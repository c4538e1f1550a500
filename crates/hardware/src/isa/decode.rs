//! RISC-V Instruction Decoder.
//!
//! Turns a raw 32-bit fetch word into an [`Instruction`] record: register indices, the
//! sign-extended immediate for the instruction's format (R, I, S, B, U, J), and the
//! [`ControlSignals`] that steer it through the rest of the pipeline.
//!
//! Anything the decoder does not recognise, including M-extension encodings when RV32M
//! is disabled and `mret` outside Machine mode, is reported as `None` and becomes an
//! illegal-instruction trap in the Decode stage.

use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::signals::{
    AluOp, BranchCond, ControlSignals, CsrOp, MemWidth, MulDivOp, OpASrc, OpBSrc, SystemOp,
};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::{self, funct3, funct7, system};

/// A decoded instruction. Immutable after Decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Instruction {
    /// Raw 32-bit encoding.
    pub raw: u32,
    /// Major opcode.
    pub opcode: u32,
    /// Destination register index.
    pub rd: usize,
    /// First source register index (or `uimm` for the immediate CSR forms).
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// funct3 field.
    pub funct3: u32,
    /// funct7 field.
    pub funct7: u32,
    /// Sign-extended immediate of the instruction's format.
    pub imm: u32,
    /// CSR address (CSR instructions only).
    pub csr_addr: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
}

impl Instruction {
    /// Returns `rs1` if the instruction reads it (and it is not `x0`).
    pub const fn rs1_read(&self) -> Option<usize> {
        if self.ctrl.rs1_use && self.rs1 != 0 {
            Some(self.rs1)
        } else {
            None
        }
    }

    /// Returns `rs2` if the instruction reads it (and it is not `x0`).
    pub const fn rs2_read(&self) -> Option<usize> {
        if self.ctrl.rs2_use && self.rs2 != 0 {
            Some(self.rs2)
        } else {
            None
        }
    }

    /// Returns `rd` if the instruction writes it (and it is not `x0`).
    pub const fn rd_write(&self) -> Option<usize> {
        if self.ctrl.reg_write && self.rd != 0 {
            Some(self.rd)
        } else {
            None
        }
    }
}

/// Decodes one instruction word.
///
/// # Arguments
///
/// * `raw` - The fetched instruction word.
/// * `enable_rv32m` - Whether the M extension is implemented.
/// * `privilege` - Current privilege mode (`mret` is legal only in Machine mode).
///
/// # Returns
///
/// The decoded instruction, or `None` if the encoding is illegal.
pub fn decode(raw: u32, enable_rv32m: bool, privilege: PrivilegeMode) -> Option<Instruction> {
    let opcode = raw.opcode();
    let f3 = raw.funct3();
    let f7 = raw.funct7();

    let mut inst = Instruction {
        raw,
        opcode,
        rd: raw.rd(),
        rs1: raw.rs1(),
        rs2: raw.rs2(),
        funct3: f3,
        funct7: f7,
        imm: 0,
        csr_addr: 0,
        ctrl: ControlSignals::default(),
    };
    let c = &mut inst.ctrl;

    match opcode {
        opcodes::OP_LUI => {
            inst.imm = raw.imm_u();
            c.reg_write = true;
            c.a_src = OpASrc::Zero;
        }
        opcodes::OP_AUIPC => {
            inst.imm = raw.imm_u();
            c.reg_write = true;
            c.a_src = OpASrc::Pc;
        }
        opcodes::OP_JAL => {
            inst.imm = raw.imm_j();
            c.reg_write = true;
            c.jump = true;
            c.a_src = OpASrc::Pc;
        }
        opcodes::OP_JALR => {
            if f3 != 0 {
                return None;
            }
            inst.imm = raw.imm_i();
            c.reg_write = true;
            c.rs1_use = true;
            c.jump = true;
            c.jalr = true;
        }
        opcodes::OP_BRANCH => {
            c.branch = Some(match f3 {
                funct3::BEQ => BranchCond::Eq,
                funct3::BNE => BranchCond::Ne,
                funct3::BLT => BranchCond::Lt,
                funct3::BGE => BranchCond::Ge,
                funct3::BLTU => BranchCond::Ltu,
                funct3::BGEU => BranchCond::Geu,
                _ => return None,
            });
            inst.imm = raw.imm_b();
            c.rs1_use = true;
            c.rs2_use = true;
            c.a_src = OpASrc::Pc;
        }
        opcodes::OP_LOAD => {
            (c.width, c.signed_load) = match f3 {
                funct3::LB => (MemWidth::Byte, true),
                funct3::LH => (MemWidth::Half, true),
                funct3::LW => (MemWidth::Word, true),
                funct3::LBU => (MemWidth::Byte, false),
                funct3::LHU => (MemWidth::Half, false),
                _ => return None,
            };
            inst.imm = raw.imm_i();
            c.reg_write = true;
            c.rs1_use = true;
            c.mem_read = true;
        }
        opcodes::OP_STORE => {
            c.width = match f3 {
                funct3::LB => MemWidth::Byte,
                funct3::LH => MemWidth::Half,
                funct3::LW => MemWidth::Word,
                _ => return None,
            };
            inst.imm = raw.imm_s();
            c.rs1_use = true;
            c.rs2_use = true;
            c.mem_write = true;
        }
        opcodes::OP_IMM => {
            c.alu_op = match (f3, f7) {
                (funct3::ADD_SUB, _) => AluOp::Add,
                (funct3::SLT, _) => AluOp::Slt,
                (funct3::SLTU, _) => AluOp::Sltu,
                (funct3::XOR, _) => AluOp::Xor,
                (funct3::OR, _) => AluOp::Or,
                (funct3::AND, _) => AluOp::And,
                (funct3::SLL, funct7::DEFAULT) => AluOp::Sll,
                (funct3::SRL_SRA, funct7::DEFAULT) => AluOp::Srl,
                (funct3::SRL_SRA, funct7::ALT) => AluOp::Sra,
                _ => return None,
            };
            inst.imm = raw.imm_i();
            c.reg_write = true;
            c.rs1_use = true;
        }
        opcodes::OP_REG => {
            match f7 {
                funct7::DEFAULT | funct7::ALT => {
                    c.alu_op = match (f3, f7) {
                        (funct3::ADD_SUB, funct7::DEFAULT) => AluOp::Add,
                        (funct3::ADD_SUB, funct7::ALT) => AluOp::Sub,
                        (funct3::SLL, funct7::DEFAULT) => AluOp::Sll,
                        (funct3::SLT, funct7::DEFAULT) => AluOp::Slt,
                        (funct3::SLTU, funct7::DEFAULT) => AluOp::Sltu,
                        (funct3::XOR, funct7::DEFAULT) => AluOp::Xor,
                        (funct3::SRL_SRA, funct7::DEFAULT) => AluOp::Srl,
                        (funct3::SRL_SRA, funct7::ALT) => AluOp::Sra,
                        (funct3::OR, funct7::DEFAULT) => AluOp::Or,
                        (funct3::AND, funct7::DEFAULT) => AluOp::And,
                        _ => return None,
                    };
                }
                funct7::MULDIV if enable_rv32m => {
                    c.muldiv = Some(match f3 {
                        0b000 => MulDivOp::Mul,
                        0b001 => MulDivOp::Mulh,
                        0b010 => MulDivOp::Mulhsu,
                        0b011 => MulDivOp::Mulhu,
                        0b100 => MulDivOp::Div,
                        0b101 => MulDivOp::Divu,
                        0b110 => MulDivOp::Rem,
                        _ => MulDivOp::Remu,
                    });
                }
                _ => return None,
            }
            c.reg_write = true;
            c.rs1_use = true;
            c.rs2_use = true;
            c.b_src = OpBSrc::Reg2;
        }
        opcodes::OP_MISC_MEM => {
            c.system = match f3 {
                funct3::FENCE => SystemOp::Fence,
                funct3::FENCE_I => SystemOp::FenceI,
                _ => return None,
            };
        }
        opcodes::OP_SYSTEM => {
            if f3 == funct3::PRIV {
                c.system = match raw {
                    system::ECALL => SystemOp::Ecall,
                    system::EBREAK => SystemOp::Ebreak,
                    system::MRET if privilege == PrivilegeMode::Machine => SystemOp::Mret,
                    _ => return None,
                };
            } else {
                c.csr_op = match f3 {
                    funct3::CSRRW | funct3::CSRRWI => CsrOp::Write,
                    funct3::CSRRS | funct3::CSRRSI => CsrOp::Set,
                    funct3::CSRRC | funct3::CSRRCI => CsrOp::Clear,
                    _ => return None,
                };
                c.csr_imm = f3 & 0b100 != 0;
                c.csr_write = f3 & 0b010 == 0 || inst.rs1 != 0;
                c.reg_write = true;
                c.rs1_use = !c.csr_imm;
                inst.csr_addr = raw.csr();
            }
        }
        _ => return None,
    }

    Some(inst)
}
