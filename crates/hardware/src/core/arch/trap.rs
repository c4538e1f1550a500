//! Trap Controller.
//!
//! The trap controller owns the CSR file and the current privilege mode, and is the only
//! component that mutates them. It performs the following:
//! 1. **Interrupt Recognition:** Samples the interrupt lines into `mip` and decides whether
//!    an interrupt is pending, enabled, and globally allowed.
//! 2. **Trap Entry:** Saves `mepc`/`mcause`/`mtval`, stacks the interrupt enable and
//!    privilege in `mstatus`, and returns the `mtvec` redirect.
//! 3. **Trap Return:** Unstacks `mstatus` on `mret` and returns the `mepc` redirect.
//! 4. **CSR Instructions:** Access checks and read-modify-write for `csrr*` at Writeback.

use tracing::debug;

use crate::common::error::Trap;
use crate::config::Config;
use crate::core::arch::csr::{self, Csrs};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::pipeline::signals::CsrOp;
use crate::isa::decode::Instruction;

/// Levels of the three interrupt inputs, sampled once at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptLines {
    /// External interrupt (`meip`).
    pub external: bool,
    /// Timer interrupt (`mtip`).
    pub timer: bool,
    /// Software interrupt (`msip`).
    pub software: bool,
}

impl InterruptLines {
    /// Returns the `mip` bits driven by these lines.
    pub const fn mip_bits(self) -> u32 {
        let mut bits = 0;
        if self.external {
            bits |= csr::MIP_MEIP;
        }
        if self.timer {
            bits |= csr::MIP_MTIP;
        }
        if self.software {
            bits |= csr::MIP_MSIP;
        }
        bits
    }
}

/// Owner of the CSR file and the privilege mode.
#[derive(Clone, Debug)]
pub struct TrapController {
    /// Architectural CSR state.
    pub csrs: Csrs,
    /// Current privilege mode.
    pub privilege: PrivilegeMode,
}

impl TrapController {
    /// Creates the controller in its reset state (Machine mode).
    pub fn new(config: &Config) -> Self {
        Self {
            csrs: Csrs::new(config),
            privilege: PrivilegeMode::Machine,
        }
    }

    /// Copies the interrupt line levels into `mip`.
    pub const fn sample_interrupts(&mut self, lines: InterruptLines) {
        self.csrs.mip = lines.mip_bits();
    }

    /// Returns the highest-priority interrupt that would be taken now, if any.
    ///
    /// Interrupts are globally enabled when `mstatus.MIE` is set or the core is running
    /// below Machine mode. Priority is external, then software, then timer.
    pub const fn pending_interrupt(&self) -> Option<Trap> {
        let global = self.csrs.mstatus & csr::MSTATUS_MIE != 0
            || matches!(self.privilege, PrivilegeMode::User);
        if !global {
            return None;
        }
        let pending = self.csrs.mip & self.csrs.mie;
        if pending & csr::MIP_MEIP != 0 {
            Some(Trap::MachineExternalInterrupt)
        } else if pending & csr::MIP_MSIP != 0 {
            Some(Trap::MachineSoftwareInterrupt)
        } else if pending & csr::MIP_MTIP != 0 {
            Some(Trap::MachineTimerInterrupt)
        } else {
            None
        }
    }

    /// Takes a trap.
    ///
    /// # Arguments
    ///
    /// * `trap` - The exception or interrupt.
    /// * `epc` - Address saved in `mepc`: the faulting instruction for exceptions, the next
    ///   instruction for interrupts.
    ///
    /// # Returns
    ///
    /// The address fetch restarts from (`mtvec`).
    pub fn enter(&mut self, trap: Trap, epc: u32) -> u32 {
        let c = &mut self.csrs;
        c.mepc = epc & !0b11;
        c.mcause = trap.cause();
        c.mtval = trap.tval();

        let mie = c.mstatus & csr::MSTATUS_MIE != 0;
        c.mstatus &= !(csr::MSTATUS_MIE | csr::MSTATUS_MPIE);
        if mie {
            c.mstatus |= csr::MSTATUS_MPIE;
        }
        c.set_mpp(self.privilege);
        let from = self.privilege;
        self.privilege = PrivilegeMode::Machine;

        debug!(
            %trap,
            epc = format_args!("{epc:#010x}"),
            %from,
            mtvec = format_args!("{:#010x}", self.csrs.mtvec),
            "trap taken"
        );
        self.csrs.mtvec
    }

    /// Returns from a Machine-mode trap.
    ///
    /// Restores `MIE` from `MPIE`, sets `MPIE`, drops to the privilege in `MPP`, and
    /// resets `MPP` to the least-privileged implemented mode.
    ///
    /// # Returns
    ///
    /// The address fetch restarts from (`mepc`).
    pub fn mret(&mut self) -> u32 {
        let c = &mut self.csrs;
        let mpie = c.mstatus & csr::MSTATUS_MPIE != 0;
        c.mstatus &= !csr::MSTATUS_MIE;
        if mpie {
            c.mstatus |= csr::MSTATUS_MIE;
        }
        c.mstatus |= csr::MSTATUS_MPIE;
        self.privilege = c.mpp();
        c.set_mpp(PrivilegeMode::User);

        debug!(
            to = %self.privilege,
            mepc = format_args!("{:#010x}", self.csrs.mepc),
            "mret"
        );
        self.csrs.mepc
    }

    /// Executes a CSR instruction at Writeback.
    ///
    /// # Arguments
    ///
    /// * `inst` - The decoded CSR instruction.
    /// * `rs1_value` - Value of `rs1` (ignored by the immediate forms).
    ///
    /// # Returns
    ///
    /// The old CSR value, to be written to `rd`.
    ///
    /// # Errors
    ///
    /// An illegal-instruction trap if the CSR is not implemented, if the instruction
    /// writes a read-only CSR, or if the CSR needs more privilege.
    pub fn execute_csr(&mut self, inst: &Instruction, rs1_value: u32) -> Result<u32, Trap> {
        let addr = inst.csr_addr;
        let write = inst.ctrl.csr_write;
        if !self.csrs.check_access(addr, write, self.privilege) {
            return Err(Trap::IllegalInstruction(inst.raw));
        }
        let Some(old) = self.csrs.read(addr) else {
            return Err(Trap::IllegalInstruction(inst.raw));
        };
        if write {
            let operand = if inst.ctrl.csr_imm {
                inst.rs1 as u32
            } else {
                rs1_value
            };
            let new = match inst.ctrl.csr_op {
                CsrOp::Write => operand,
                CsrOp::Set => old | operand,
                CsrOp::Clear => old & !operand,
                CsrOp::None => old,
            };
            self.csrs.write(addr, new);
        }
        Ok(old)
    }
}
