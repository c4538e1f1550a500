//! RV32I, RV32M, and privileged encodings.
//!
//! Defines the major opcodes (bits 6-0) and the function codes used to tell the
//! instructions of one opcode apart.

/// Load instructions (LB, LH, LW, LBU, LHU).
pub const OP_LOAD: u32 = 0b0000011;

/// Memory ordering instructions (FENCE, FENCE.I).
pub const OP_MISC_MEM: u32 = 0b0001111;

/// Immediate arithmetic instructions (ADDI, ANDI, SLLI, etc.).
pub const OP_IMM: u32 = 0b0010011;

/// Add Upper Immediate to PC (AUIPC).
pub const OP_AUIPC: u32 = 0b0010111;

/// Store instructions (SB, SH, SW).
pub const OP_STORE: u32 = 0b0100011;

/// Register-Register arithmetic (ADD, SUB, SLL, MUL, DIV, etc.).
pub const OP_REG: u32 = 0b0110011;

/// Load Upper Immediate (LUI).
pub const OP_LUI: u32 = 0b0110111;

/// Conditional Branch instructions (BEQ, BNE, etc.).
pub const OP_BRANCH: u32 = 0b1100011;

/// Jump and Link Register (JALR).
pub const OP_JALR: u32 = 0b1100111;

/// Jump and Link (JAL).
pub const OP_JAL: u32 = 0b1101111;

/// System instructions (ECALL, EBREAK, MRET, CSR*).
pub const OP_SYSTEM: u32 = 0b1110011;

/// Function codes (bits 14-12).
pub mod funct3 {
    /// BEQ.
    pub const BEQ: u32 = 0b000;
    /// BNE.
    pub const BNE: u32 = 0b001;
    /// BLT.
    pub const BLT: u32 = 0b100;
    /// BGE.
    pub const BGE: u32 = 0b101;
    /// BLTU.
    pub const BLTU: u32 = 0b110;
    /// BGEU.
    pub const BGEU: u32 = 0b111;

    /// LB / SB.
    pub const LB: u32 = 0b000;
    /// LH / SH.
    pub const LH: u32 = 0b001;
    /// LW / SW.
    pub const LW: u32 = 0b010;
    /// LBU.
    pub const LBU: u32 = 0b100;
    /// LHU.
    pub const LHU: u32 = 0b101;

    /// ADD / SUB / ADDI / MUL.
    pub const ADD_SUB: u32 = 0b000;
    /// SLL / SLLI / MULH.
    pub const SLL: u32 = 0b001;
    /// SLT / SLTI / MULHSU.
    pub const SLT: u32 = 0b010;
    /// SLTU / SLTIU / MULHU.
    pub const SLTU: u32 = 0b011;
    /// XOR / XORI / DIV.
    pub const XOR: u32 = 0b100;
    /// SRL / SRA / SRLI / SRAI / DIVU.
    pub const SRL_SRA: u32 = 0b101;
    /// OR / ORI / REM.
    pub const OR: u32 = 0b110;
    /// AND / ANDI / REMU.
    pub const AND: u32 = 0b111;

    /// FENCE.
    pub const FENCE: u32 = 0b000;
    /// FENCE.I.
    pub const FENCE_I: u32 = 0b001;

    /// ECALL / EBREAK / MRET.
    pub const PRIV: u32 = 0b000;
    /// CSRRW.
    pub const CSRRW: u32 = 0b001;
    /// CSRRS.
    pub const CSRRS: u32 = 0b010;
    /// CSRRC.
    pub const CSRRC: u32 = 0b011;
    /// CSRRWI.
    pub const CSRRWI: u32 = 0b101;
    /// CSRRSI.
    pub const CSRRSI: u32 = 0b110;
    /// CSRRCI.
    pub const CSRRCI: u32 = 0b111;
}

/// Function codes (bits 31-25).
pub mod funct7 {
    /// Default (ADD, SRL, and the shift-immediate forms).
    pub const DEFAULT: u32 = 0b0000000;
    /// Alternate (SUB, SRA).
    pub const ALT: u32 = 0b0100000;
    /// M extension (MUL, DIV, REM).
    pub const MULDIV: u32 = 0b0000001;
}

/// Complete encodings of the fixed system instructions.
pub mod system {
    /// `ecall`.
    pub const ECALL: u32 = 0x0000_0073;
    /// `ebreak`.
    pub const EBREAK: u32 = 0x0010_0073;
    /// `mret`.
    pub const MRET: u32 = 0x3020_0073;
}
