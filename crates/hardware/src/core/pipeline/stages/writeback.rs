//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the pipeline, the only place architectural
//! state changes. It performs the following:
//! 1. **Trap Entry:** An entry carrying an exception is not committed; the trap is taken
//!    with `mepc` = its PC and every younger stage is flushed.
//! 2. **Commit:** Writes `rd`, counts the retirement, and executes CSR instructions
//!    (which may still raise an illegal-instruction trap here).
//! 3. **Trap Return:** `mret` restores the privilege stack and redirects to `mepc`.
//! 4. **Interrupts:** After a normal commit, a pending enabled interrupt is taken with
//!    `mepc` = the committed instruction's architectural successor.

use tracing::{debug, trace};

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::cpu::Flush;
use crate::core::pipeline::signals::{CsrOp, SystemOp};

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// `true` if the stage redirected the pipeline (trap, `mret` or interrupt), in which
/// case the remaining stages do nothing this cycle.
pub fn wb_stage(cpu: &mut Cpu) -> bool {
    let Some(wb) = cpu.stage_w.take() else {
        return false;
    };

    if let Some(trap) = wb.trap {
        take_trap(cpu, trap, wb.pc);
        return true;
    }

    let inst = &wb.inst;
    let instret = cpu.trap_ctl.csrs.minstret;
    cpu.trap_ctl.csrs.minstret = instret.wrapping_add(1);

    let value = if inst.ctrl.csr_op == CsrOp::None {
        wb.result.unwrap_or(0)
    } else {
        match cpu.trap_ctl.execute_csr(inst, wb.rv1) {
            Ok(old) => old,
            Err(trap) => {
                cpu.trap_ctl.csrs.minstret = instret;
                take_trap(cpu, trap, wb.pc);
                return true;
            }
        }
    };

    if let Some(rd) = inst.rd_write() {
        cpu.regs.write(rd, value);
    }
    cpu.stats.instructions_retired += 1;
    trace!(
        pc = format_args!("{:#010x}", wb.pc),
        seq = wb.seq,
        raw = format_args!("{:#010x}", inst.raw),
        rd = inst.rd_write(),
        value = format_args!("{value:#x}"),
        "commit"
    );

    if inst.ctrl.system == SystemOp::Mret {
        let target = cpu.trap_ctl.mret();
        cpu.redirect(target, Flush::Writeback);
        return true;
    }

    if let Some(irq) = cpu.trap_ctl.pending_interrupt() {
        debug!(%irq, next_pc = format_args!("{:#010x}", wb.next_pc), "interrupt");
        cpu.stats.interrupts += 1;
        let target = cpu.trap_ctl.enter(irq, wb.next_pc);
        cpu.redirect(target, Flush::Writeback);
        return true;
    }
    false
}

fn take_trap(cpu: &mut Cpu, trap: Trap, pc: u32) {
    cpu.stats.exceptions += 1;
    let target = cpu.trap_ctl.enter(trap, pc);
    cpu.redirect(target, Flush::Writeback);
}
