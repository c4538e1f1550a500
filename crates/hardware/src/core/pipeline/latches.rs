//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry held by each stage register of the six-stage pipeline:
//! Fetch-Address → Fetch-Data → Decode → Execute → Memory → Writeback.
//!
//! 1. **Instruction Flow:** Each entry carries the PC, a monotonic sequence number, and
//!    the state the next stage needs.
//! 2. **Trap Propagation:** An exception detected in any stage is attached to the entry
//!    and travels to Writeback, where it is taken. Later stages skip the work of an
//!    entry that already carries a trap.
//! 3. **Bubbles:** A stage register is an `Option`; `None` is a bubble.
//!
//! The Fetch-Address stage has no entry of its own: it is the fetch PC held by the core.

use crate::common::error::Trap;
use crate::core::units::bru::Prediction;
use crate::isa::decode::Instruction;

/// Entry in the Fetch-Data stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Sequence number assigned in Fetch-Address.
    pub seq: u64,
    /// Prediction made in Fetch-Address.
    pub pred: Prediction,
    /// Instruction word, once it has arrived.
    pub raw: Option<u32>,
    /// Instruction access fault, if the fetch failed.
    pub trap: Option<Trap>,
}

impl FetchEntry {
    /// Returns `true` once the fetch has produced a word or a fault.
    pub const fn is_complete(&self) -> bool {
        self.raw.is_some() || self.trap.is_some()
    }
}

/// Entry in the Decode stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Sequence number.
    pub seq: u64,
    /// Prediction made in Fetch-Address.
    pub pred: Prediction,
    /// Instruction word (zero if the fetch faulted).
    pub raw: u32,
    /// Decoded form, filled the first cycle the entry is in Decode.
    pub inst: Option<Instruction>,
    /// Exception attached so far.
    pub trap: Option<Trap>,
}

impl From<FetchEntry> for DecodeEntry {
    fn from(f: FetchEntry) -> Self {
        Self {
            pc: f.pc,
            seq: f.seq,
            pred: f.pred,
            raw: f.raw.unwrap_or(0),
            inst: None,
            trap: f.trap,
        }
    }
}

/// Entry in the Execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Sequence number.
    pub seq: u64,
    /// Prediction made in Fetch-Address.
    pub pred: Prediction,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Value of `rs1` read in Decode.
    pub rv1: u32,
    /// Value of `rs2` read in Decode.
    pub rv2: u32,
    /// Result destined for `rd`, once computed.
    pub result: Option<u32>,
    /// Effective address of a load or store.
    pub addr: u32,
    /// Architectural address of the next instruction.
    pub next_pc: u32,
    /// Single-cycle work (ALU, resolution, triggers) has been done.
    pub executed: bool,
    /// Exception attached so far.
    pub trap: Option<Trap>,
}

/// Entry in the Memory stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Sequence number.
    pub seq: u64,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Value of `rs1` (CSR instructions use it at Writeback).
    pub rv1: u32,
    /// Store data (`rs2`).
    pub store_data: u32,
    /// Effective address of a load or store.
    pub addr: u32,
    /// Result destined for `rd`; loads fill it when their access completes.
    pub result: Option<u32>,
    /// Architectural address of the next instruction.
    pub next_pc: u32,
    /// Exception attached so far.
    pub trap: Option<Trap>,
}

impl From<ExecuteEntry> for MemoryEntry {
    fn from(x: ExecuteEntry) -> Self {
        Self {
            pc: x.pc,
            seq: x.seq,
            inst: x.inst,
            rv1: x.rv1,
            store_data: x.rv2,
            addr: x.addr,
            result: x.result,
            next_pc: x.next_pc,
            trap: x.trap,
        }
    }
}

/// Entry in the Writeback stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WritebackEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Sequence number.
    pub seq: u64,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Value of `rs1` (CSR operand).
    pub rv1: u32,
    /// Result destined for `rd`. `None` for CSR reads, which produce it here.
    pub result: Option<u32>,
    /// Architectural address of the next instruction.
    pub next_pc: u32,
    /// Exception to take instead of committing.
    pub trap: Option<Trap>,
}

impl From<MemoryEntry> for WritebackEntry {
    fn from(m: MemoryEntry) -> Self {
        Self {
            pc: m.pc,
            seq: m.seq,
            inst: m.inst,
            rv1: m.rv1,
            result: m.result,
            next_pc: m.next_pc,
            trap: m.trap,
        }
    }
}
