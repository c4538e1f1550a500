//! Memory (MEM) Stage.
//!
//! This module implements the data-access stage of the pipeline. It performs the following:
//! 1. **Alignment:** Misaligned loads and stores raise their address-misaligned exception
//!    without touching memory.
//! 2. **Data Access:** Presents loads and stores to the load/store unit every cycle until
//!    they finish; bus errors become precise access faults.
//! 3. **Instruction Fence:** `fence.i` waits for the data port to drain and any
//!    instruction refill to finish, invalidates the instruction cache, and refetches the
//!    next instruction.
//!
//! The stage runs after Writeback in the same cycle, and only if Writeback did not
//! redirect, so an access that starts here is never abandoned.

use tracing::debug;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::cpu::Flush;
use crate::core::pipeline::latches::WritebackEntry;
use crate::core::pipeline::signals::SystemOp;
use crate::core::units::lsu::format::check_alignment;
use crate::core::units::lsu::{MemOp, MemStatus};
use crate::soc::Interconnect;

/// Executes the memory stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `bus` - The interconnect, consulted for the address map.
///
/// # Returns
///
/// `true` if the stage redirected the pipeline (`fence.i`).
pub fn mem_stage(cpu: &mut Cpu, bus: &Interconnect) -> bool {
    let Some(mut mem) = cpu.stage_m else {
        return false;
    };
    let ctrl = mem.inst.ctrl;
    let mut redirect = false;

    if mem.trap.is_none() && (ctrl.mem_read || ctrl.mem_write) {
        if let Some(trap) = check_alignment(mem.addr, ctrl.width, ctrl.mem_write) {
            mem.trap = Some(trap);
        } else {
            let op = MemOp {
                seq: mem.seq,
                addr: mem.addr,
                width: ctrl.width,
                signed: ctrl.signed_load,
                store: ctrl.mem_write.then_some(mem.store_data),
            };
            match cpu.lsu.access(&op, bus.is_mapped(mem.addr)) {
                MemStatus::Pending => {
                    cpu.stats.stalls_mem += 1;
                    return false;
                }
                MemStatus::Done(value) => {
                    if ctrl.mem_read {
                        mem.result = Some(value);
                    }
                }
                MemStatus::Fault(trap) => mem.trap = Some(trap),
            }
        }
    } else if mem.trap.is_none() && ctrl.system == SystemOp::FenceI {
        if !cpu.lsu.is_idle() || cpu.fetch.refill_active() {
            cpu.stats.stalls_mem += 1;
            return false;
        }
        cpu.fetch.invalidate_all();
        let target = mem.pc.wrapping_add(INSTRUCTION_SIZE);
        debug!(pc = format_args!("{:#010x}", mem.pc), "fence.i");
        cpu.redirect(target, Flush::Memory);
        redirect = true;
    }

    cpu.stage_m = None;
    cpu.stage_w = Some(WritebackEntry::from(mem));
    redirect
}
