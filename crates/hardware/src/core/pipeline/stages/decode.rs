//! Instruction Decode (ID) Stage.
//!
//! This module implements the third stage of the pipeline. It performs the following:
//! 1. **Decoding:** Converts the raw instruction word into an [`Instruction`] the first
//!    cycle the entry is in Decode. Unknown encodings become illegal-instruction traps.
//! 2. **Synchronous Traps:** `ecall` and `ebreak` attach their exception here.
//! 3. **Register Read:** Reads `rs1`/`rs2` from the register file or forwards them from
//!    Memory and Writeback; stalls when a needed value is not computed yet or a CSR
//!    instruction has not committed.
//!
//! [`Instruction`]: crate::isa::decode::Instruction

use tracing::trace;

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::hazards::{self, Producer};
use crate::core::pipeline::latches::{DecodeEntry, ExecuteEntry};
use crate::core::pipeline::signals::SystemOp;
use crate::isa::decode::decode;

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn decode_stage(cpu: &mut Cpu) {
    let Some(mut id) = cpu.stage_d else {
        return;
    };

    if id.trap.is_none() && id.inst.is_none() {
        decode_entry(cpu, &mut id);
    }

    if cpu.stage_x.is_some() {
        cpu.stage_d = Some(id);
        return;
    }

    let inst = id.inst.unwrap_or_default();
    let (rv1, rv2) = if id.trap.is_some() {
        (0, 0)
    } else {
        let producers = [
            cpu.stage_m.as_ref().and_then(Producer::from_memory),
            cpu.stage_w.as_ref().and_then(Producer::from_writeback),
        ];
        let Some(ops) = hazards::read_operands(&inst, &producers, &cpu.regs) else {
            cpu.stats.stalls_data += 1;
            cpu.stage_d = Some(id);
            return;
        };
        trace!(seq = id.seq, src1 = ?ops.src1, src2 = ?ops.src2, "operands");
        (ops.rv1, ops.rv2)
    };

    cpu.stage_d = None;
    cpu.stage_x = Some(ExecuteEntry {
        pc: id.pc,
        seq: id.seq,
        pred: id.pred,
        inst,
        rv1,
        rv2,
        result: None,
        addr: 0,
        next_pc: id.pc,
        executed: false,
        trap: id.trap,
    });
}

fn decode_entry(cpu: &Cpu, id: &mut DecodeEntry) {
    let privilege = cpu.trap_ctl.privilege;
    let Some(inst) = decode(id.raw, cpu.config.isa.enable_rv32m, privilege) else {
        id.trap = Some(Trap::IllegalInstruction(id.raw));
        return;
    };
    id.trap = match inst.ctrl.system {
        SystemOp::Ecall if privilege == PrivilegeMode::User => {
            Some(Trap::EnvironmentCallFromUMode)
        }
        SystemOp::Ecall => Some(Trap::EnvironmentCallFromMMode),
        SystemOp::Ebreak => Some(Trap::Breakpoint(id.pc)),
        _ => None,
    };
    id.inst = Some(inst);
}
