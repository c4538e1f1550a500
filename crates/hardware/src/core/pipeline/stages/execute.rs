//! Execute (EX) Stage.
//!
//! This module implements the fourth stage of the pipeline. It performs the following:
//! 1. **Arithmetic Execution:** Single-cycle ALU operations and effective addresses.
//! 2. **Multi-Cycle Execution:** Drives the multiplier/divider until it reports ready.
//! 3. **Branch Resolution:** Evaluates branches and jumps, trains the predictor, and
//!    redirects fetch when the Fetch-Address prediction was wrong.
//! 4. **Triggers:** Matches the PC and load/store addresses against the armed triggers.
//!
//! The single-cycle work is done once per instruction, the first cycle it spends here;
//! the entry may then wait for the multi-cycle unit or for the Memory stage to free up.

use tracing::debug;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::cpu::Flush;
use crate::core::pipeline::latches::{ExecuteEntry, MemoryEntry};
use crate::core::pipeline::signals::{CsrOp, OpASrc, OpBSrc};
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::trigger::MatchKind;

/// Bit mask clearing bit 0 of a `jalr` target.
const JALR_ALIGNMENT_MASK: u32 = !1;

/// Executes the execute stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// `true` if the stage redirected fetch (misprediction).
pub fn execute_stage(cpu: &mut Cpu) -> bool {
    let Some(mut ex) = cpu.stage_x else {
        return false;
    };
    let mut redirect = false;

    if ex.trap.is_none() && !ex.executed {
        ex.executed = true;
        redirect = execute_once(cpu, &mut ex);
    }

    let muldiv = ex
        .inst
        .ctrl
        .muldiv
        .filter(|_| ex.trap.is_none() && ex.result.is_none());
    if let Some(op) = muldiv {
        match cpu.muldiv.step(ex.seq, op, ex.rv1, ex.rv2) {
            Some(value) => ex.result = Some(value),
            None => {
                cpu.stats.stalls_muldiv += 1;
                cpu.stage_x = Some(ex);
                return redirect;
            }
        }
    }

    if cpu.stage_m.is_none() {
        cpu.stage_m = Some(MemoryEntry::from(ex));
        cpu.stage_x = None;
    } else {
        cpu.stage_x = Some(ex);
    }
    redirect
}

/// Single-cycle part of execution. Returns `true` on a redirect.
fn execute_once(cpu: &mut Cpu, ex: &mut ExecuteEntry) -> bool {
    let ctrl = ex.inst.ctrl;
    let pc = ex.pc;
    let privilege = cpu.trap_ctl.privilege;

    if let Some(trap) = check_trigger(cpu, MatchKind::Execute, pc) {
        ex.trap = Some(trap);
        return false;
    }

    let a = match ctrl.a_src {
        OpASrc::Reg1 => ex.rv1,
        OpASrc::Pc => pc,
        OpASrc::Zero => 0,
    };
    let b = match ctrl.b_src {
        OpBSrc::Imm => ex.inst.imm,
        OpBSrc::Reg2 => ex.rv2,
    };
    let alu = Alu::execute(ctrl.alu_op, a, b);
    let fallthrough = pc.wrapping_add(INSTRUCTION_SIZE);
    ex.next_pc = fallthrough;

    if ctrl.mem_read || ctrl.mem_write {
        ex.addr = alu;
        let kind = if ctrl.mem_write {
            MatchKind::Store
        } else {
            MatchKind::Load
        };
        if let Some(trap) = check_trigger(cpu, kind, alu) {
            ex.trap = Some(trap);
            return false;
        }
    } else if ctrl.is_control() {
        let (taken, target) = if ctrl.jump {
            ex.result = Some(fallthrough);
            let target = if ctrl.jalr {
                alu & JALR_ALIGNMENT_MASK
            } else {
                alu
            };
            (true, target)
        } else {
            let taken = ctrl
                .branch
                .is_some_and(|cond| cond.evaluate(ex.rv1, ex.rv2));
            (taken, alu)
        };
        cpu.stats.branches += 1;
        if taken {
            if target & 0b11 != 0 {
                ex.trap = Some(Trap::InstructionAddressMisaligned(target));
                return false;
            }
            ex.next_pc = target;
        }
        cpu.predictor.update(pc, taken, target);
    } else if ctrl.muldiv.is_none() && ctrl.csr_op == CsrOp::None {
        ex.result = Some(alu);
    }

    let predicted = if ex.pred.taken {
        ex.pred.target
    } else {
        fallthrough
    };
    if predicted != ex.next_pc {
        cpu.stats.mispredictions += 1;
        debug!(
            pc = format_args!("{pc:#010x}"),
            predicted = format_args!("{predicted:#010x}"),
            actual = format_args!("{:#010x}", ex.next_pc),
            %privilege,
            "misprediction"
        );
        cpu.redirect(ex.next_pc, Flush::Execute);
        return true;
    }
    false
}

fn check_trigger(cpu: &Cpu, kind: MatchKind, value: u32) -> Option<Trap> {
    cpu.trap_ctl
        .csrs
        .triggers
        .as_ref()?
        .check(kind, value, cpu.trap_ctl.privilege)
}
