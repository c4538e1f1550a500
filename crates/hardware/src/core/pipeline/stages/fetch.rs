//! Instruction Fetch Stages.
//!
//! The front end is split in two stages:
//! 1. **Fetch-Address (A):** Holds the fetch PC, assigns each instruction a sequence
//!    number, consults the branch predictor and computes the next fetch PC.
//! 2. **Fetch-Data (F):** Presents the PC to the fetch unit every cycle until the
//!    instruction word (or an access fault) is available, then hands it to Decode.
//!
//! A redirect from a later stage replaces the fetch PC and empties Fetch-Data; an
//! abandoned bus cycle still completes, but its word is dropped by the fetch unit.

use tracing::trace;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::pipeline::latches::{DecodeEntry, FetchEntry};
use crate::core::units::bru::BranchPredictor;
use crate::core::units::fetch::FetchStatus;

/// Executes the Fetch-Data stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn fetch_stage(cpu: &mut Cpu) {
    let Some(mut entry) = cpu.stage_f else {
        return;
    };

    if !entry.is_complete() {
        match cpu.fetch.fetch(entry.pc, entry.seq) {
            FetchStatus::Ready(raw) => entry.raw = Some(raw),
            FetchStatus::Fault(trap) => entry.trap = Some(trap),
            FetchStatus::Pending => cpu.stats.stalls_fetch += 1,
        }
    }

    if entry.is_complete() && cpu.stage_d.is_none() {
        cpu.stage_d = Some(DecodeEntry::from(entry));
        cpu.stage_f = None;
    } else {
        cpu.stage_f = Some(entry);
    }
}

/// Executes the Fetch-Address stage.
///
/// Issues the instruction at the fetch PC into Fetch-Data when that stage is free.
pub fn fetch_address_stage(cpu: &mut Cpu) {
    if cpu.stage_f.is_some() {
        return;
    }
    let pc = cpu.pc;
    let pred = cpu.predictor.predict(pc);
    let seq = cpu.next_seq;
    cpu.next_seq += 1;
    cpu.pc = if pred.taken {
        pred.target
    } else {
        pc.wrapping_add(INSTRUCTION_SIZE)
    };
    trace!(
        pc = format_args!("{pc:#010x}"),
        seq,
        next = format_args!("{:#010x}", cpu.pc),
        "fetch"
    );
    cpu.stage_f = Some(FetchEntry {
        pc,
        seq,
        pred,
        raw: None,
        trap: None,
    });
}
