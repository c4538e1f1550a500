//! Pipeline control signals and operation types.
//!
//! This module defines the signals that control instruction execution. It performs:
//! 1. **Operation Classification:** Categorizes ALU, multiply/divide, CSR, and system operations.
//! 2. **Operand Selection:** Defines sources for ALU inputs (registers, PC, or immediates).
//! 3. **Memory Control:** Specifies access widths and sign-extension requirements.
//! 4. **Control Flow:** Branch conditions and jump kinds resolved in Execute.

/// Single-cycle ALU operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Addition (also address generation, LUI, AUIPC).
    #[default]
    Add,
    /// Subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
    /// Bitwise XOR.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
}

/// Multi-cycle M-extension operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    /// Multiply, low 32 bits.
    Mul,
    /// Multiply, high 32 bits, signed × signed.
    Mulh,
    /// Multiply, high 32 bits, signed × unsigned.
    Mulhsu,
    /// Multiply, high 32 bits, unsigned × unsigned.
    Mulhu,
    /// Signed division.
    Div,
    /// Unsigned division.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
}

impl MulDivOp {
    /// Returns `true` for the operations handled by the divider.
    pub const fn is_divide(self) -> bool {
        matches!(self, Self::Div | Self::Divu | Self::Rem | Self::Remu)
    }
}

/// Source for the first ALU operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Value of `rs1`.
    #[default]
    Reg1,
    /// Program counter of the instruction.
    Pc,
    /// Constant zero (LUI).
    Zero,
}

/// Source for the second ALU operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Sign-extended immediate.
    #[default]
    Imm,
    /// Value of `rs2`.
    Reg2,
}

/// Width of a memory access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    #[default]
    Word,
}

/// Conditional branch comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCond {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than (signed).
    Lt,
    /// Greater or equal (signed).
    Ge,
    /// Less than (unsigned).
    Ltu,
    /// Greater or equal (unsigned).
    Geu,
}

impl BranchCond {
    /// Evaluates the comparison on two register values.
    pub const fn evaluate(self, a: u32, b: u32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => (a as i32) < (b as i32),
            Self::Ge => (a as i32) >= (b as i32),
            Self::Ltu => a < b,
            Self::Geu => a >= b,
        }
    }
}

/// CSR read-modify-write operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsrOp {
    /// Not a CSR instruction.
    #[default]
    None,
    /// Write (`csrrw`, `csrrwi`).
    Write,
    /// Set bits (`csrrs`, `csrrsi`).
    Set,
    /// Clear bits (`csrrc`, `csrrci`).
    Clear,
}

/// System and ordering operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SystemOp {
    /// Ordinary instruction.
    #[default]
    None,
    /// Environment call.
    Ecall,
    /// Breakpoint.
    Ebreak,
    /// Return from machine-mode trap.
    Mret,
    /// Memory fence (no-op for this in-order core).
    Fence,
    /// Instruction-stream fence.
    FenceI,
}

/// Control signals produced by the decoder.
///
/// Carried unchanged from Decode to Writeback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Instruction writes `rd`.
    pub reg_write: bool,
    /// Instruction reads `rs1`.
    pub rs1_use: bool,
    /// Instruction reads `rs2`.
    pub rs2_use: bool,
    /// ALU operation.
    pub alu_op: AluOp,
    /// First ALU operand source.
    pub a_src: OpASrc,
    /// Second ALU operand source.
    pub b_src: OpBSrc,
    /// Multi-cycle M-extension operation, if any.
    pub muldiv: Option<MulDivOp>,
    /// Load.
    pub mem_read: bool,
    /// Store.
    pub mem_write: bool,
    /// Access width for loads and stores.
    pub width: MemWidth,
    /// Sign-extend loaded data.
    pub signed_load: bool,
    /// Conditional branch comparison, if a branch.
    pub branch: Option<BranchCond>,
    /// `jal` or `jalr`.
    pub jump: bool,
    /// `jalr` (target computed from `rs1`).
    pub jalr: bool,
    /// CSR operation.
    pub csr_op: CsrOp,
    /// Immediate CSR form: the `rs1` field is a 5-bit zero-extended operand.
    pub csr_imm: bool,
    /// CSR instruction writes the CSR (`funct3[1] == 0` or non-zero source field).
    pub csr_write: bool,
    /// System operation.
    pub system: SystemOp,
}

impl ControlSignals {
    /// Returns `true` for branches and jumps.
    pub const fn is_control(&self) -> bool {
        self.branch.is_some() || self.jump
    }

    /// Returns `true` if the result only exists once the instruction reaches Writeback
    /// (loads and CSR reads), so it cannot be forwarded from Execute or Memory.
    pub const fn result_late(&self) -> bool {
        self.mem_read || !matches!(self.csr_op, CsrOp::None)
    }
}
