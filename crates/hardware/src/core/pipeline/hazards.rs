//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for maintaining pipeline consistency when data
//! dependencies exist between instructions. It provides:
//! 1. **Producer View:** The destination register and (if already known) the result of
//!    each older in-flight instruction.
//! 2. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards by taking the value
//!    from the youngest older producer instead of the register file.
//! 3. **Stall Detection:** A producer whose result is not computed yet (a load still
//!    accessing memory, a CSR read that only happens at Writeback, an instruction
//!    carrying a trap) stalls Decode.
//! 4. **CSR Serialisation:** Instructions behind an uncommitted CSR instruction wait
//!    for it to commit.
//!
//! The functions are pure: they read a snapshot of the stage registers and never
//! mutate them.

use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::latches::{ExecuteEntry, MemoryEntry, WritebackEntry};
use crate::core::pipeline::signals::CsrOp;
use crate::isa::decode::Instruction;

/// An older in-flight instruction that will write a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Producer {
    /// Destination register (never `x0`).
    pub rd: usize,
    /// The value it will write, if already computed.
    pub value: Option<u32>,
    /// It is a CSR instruction.
    pub csr: bool,
}

impl Producer {
    fn new(inst: &Instruction, result: Option<u32>, has_trap: bool) -> Option<Self> {
        let csr = inst.ctrl.csr_op != CsrOp::None;
        let rd = inst.rd_write();
        if has_trap {
            // Still a barrier for its destination: the value will never be written.
            return rd.map(|rd| Self {
                rd,
                value: None,
                csr,
            });
        }
        match rd {
            Some(rd) => Some(Self {
                rd,
                value: result,
                csr,
            }),
            // CSR instructions with rd = x0 still serialise.
            None if csr => Some(Self {
                rd: 0,
                value: None,
                csr,
            }),
            None => None,
        }
    }

    /// Producer view of an Execute-stage entry.
    pub fn from_execute(x: &ExecuteEntry) -> Option<Self> {
        Self::new(&x.inst, x.result, x.trap.is_some())
    }

    /// Producer view of a Memory-stage entry.
    pub fn from_memory(m: &MemoryEntry) -> Option<Self> {
        Self::new(&m.inst, m.result, m.trap.is_some())
    }

    /// Producer view of a Writeback-stage entry.
    pub fn from_writeback(w: &WritebackEntry) -> Option<Self> {
        Self::new(&w.inst, w.result, w.trap.is_some())
    }
}

/// Where an operand value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSource {
    /// The register file (or `x0`, or an unused operand).
    RegisterFile,
    /// Bypassed from the producer at this index of the producer list.
    Forwarded(usize),
}

/// Source operand values for an instruction leaving Decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operands {
    /// Value of `rs1`.
    pub rv1: u32,
    /// Value of `rs2`.
    pub rv2: u32,
    /// Origin of `rv1`.
    pub src1: OperandSource,
    /// Origin of `rv2`.
    pub src2: OperandSource,
}

/// Resolves one source register.
///
/// # Arguments
///
/// * `rs` - Register read by the consumer, or `None` if the operand is unused or `x0`.
/// * `producers` - Older in-flight instructions, youngest first.
/// * `regs` - The register file, already updated by this cycle's Writeback commit.
///
/// # Returns
///
/// The value and its origin, or `None` if the youngest producer of `rs` has no
/// result yet.
pub fn resolve_operand(
    rs: Option<usize>,
    producers: &[Option<Producer>],
    regs: &Gpr,
) -> Option<(u32, OperandSource)> {
    let Some(rs) = rs else {
        return Some((0, OperandSource::RegisterFile));
    };
    let youngest = producers
        .iter()
        .enumerate()
        .find_map(|(i, p)| p.filter(|p| p.rd == rs).map(|p| (i, p)));
    match youngest {
        Some((i, p)) => p.value.map(|v| (v, OperandSource::Forwarded(i))),
        None => Some((regs.read(rs), OperandSource::RegisterFile)),
    }
}

/// Returns `true` if an uncommitted CSR instruction is in flight.
pub fn csr_barrier(producers: &[Option<Producer>]) -> bool {
    producers.iter().flatten().any(|p| p.csr)
}

/// Reads both source operands of the instruction in Decode.
///
/// # Returns
///
/// The operands, or `None` if Decode must stall this cycle.
///
/// # Examples
///
/// ```
/// use bellatrix_core::core::arch::gpr::Gpr;
/// use bellatrix_core::core::arch::mode::PrivilegeMode;
/// use bellatrix_core::core::pipeline::hazards::{Producer, read_operands};
/// use bellatrix_core::isa::decode::decode;
///
/// // add x3, x1, x2
/// let add = decode(0x0020_81b3, false, PrivilegeMode::Machine).unwrap();
/// let mut regs = Gpr::new();
/// regs.write(2, 7);
///
/// // x1 is produced by an older instruction whose result is known.
/// let ready = [Some(Producer { rd: 1, value: Some(5), csr: false })];
/// let ops = read_operands(&add, &ready, &regs).unwrap();
/// assert_eq!((ops.rv1, ops.rv2), (5, 7));
///
/// // A load into x1 that has not returned yet stalls the add.
/// let pending = [Some(Producer { rd: 1, value: None, csr: false })];
/// assert!(read_operands(&add, &pending, &regs).is_none());
/// ```
pub fn read_operands(
    inst: &Instruction,
    producers: &[Option<Producer>],
    regs: &Gpr,
) -> Option<Operands> {
    if csr_barrier(producers) {
        return None;
    }
    let (rv1, src1) = resolve_operand(inst.rs1_read(), producers, regs)?;
    let (rv2, src2) = resolve_operand(inst.rs2_read(), producers, regs)?;
    Some(Operands {
        rv1,
        rv2,
        src1,
        src2,
    })
}
