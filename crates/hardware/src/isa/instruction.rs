//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for the register, function-code, and immediate fields of
//! 32-bit RISC-V encodings. Immediates are returned sign-extended to 32 bits.

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    ///
    /// For the immediate CSR forms this field holds the 5-bit `uimm` operand.
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;

    /// I-type immediate: `inst[31:20]`.
    fn imm_i(&self) -> u32;

    /// S-type immediate: `inst[31:25] | inst[11:7]`.
    fn imm_s(&self) -> u32;

    /// B-type immediate: a signed, even byte offset.
    fn imm_b(&self) -> u32;

    /// U-type immediate: `inst[31:12] << 12`.
    fn imm_u(&self) -> u32;

    /// J-type immediate: a signed, even byte offset.
    fn imm_j(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }

    #[inline(always)]
    fn imm_i(&self) -> u32 {
        ((*self as i32) >> 20) as u32
    }

    #[inline(always)]
    fn imm_s(&self) -> u32 {
        let high = ((*self as i32) >> 25) << 5;
        let low = ((self >> 7) & 0x1F) as i32;
        (high | low) as u32
    }

    #[inline(always)]
    fn imm_b(&self) -> u32 {
        // imm[12|10:5] in bits 31..25, imm[4:1|11] in bits 11..7.
        let sign = ((*self as i32) >> 31) << 12;
        let bit11 = ((self >> 7) & 0x1) << 11;
        let bits10_5 = ((self >> 25) & 0x3F) << 5;
        let bits4_1 = ((self >> 8) & 0xF) << 1;
        (sign as u32) | bit11 | bits10_5 | bits4_1
    }

    #[inline(always)]
    fn imm_u(&self) -> u32 {
        self & 0xFFFF_F000
    }

    #[inline(always)]
    fn imm_j(&self) -> u32 {
        // imm[20|10:1|11|19:12] in bits 31..12.
        let sign = ((*self as i32) >> 31) << 20;
        let bits19_12 = self & 0x000F_F000;
        let bit11 = ((self >> 20) & 0x1) << 11;
        let bits10_1 = ((self >> 21) & 0x3FF) << 1;
        (sign as u32) | bits19_12 | bit11 | bits10_1
    }
}
