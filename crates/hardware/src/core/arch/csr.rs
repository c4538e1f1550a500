//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the CSR subsystem of the core. It provides:
//! 1. **Address Definitions:** Constants for the machine, user-counter, and trigger CSRs.
//! 2. **Field Masks:** Bitmasks for `mstatus`, `mie`/`mip`, and `misa`.
//! 3. **Register Storage:** The `Csrs` struct holding architectural CSR state.
//! 4. **Access Logic:** Implementation checks, WARL write masking, and privilege checks.

use crate::common::constants::WORD_ALIGN_MASK;
use crate::config::Config;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::units::trigger::TriggerModule;

/// Machine vendor ID CSR address.
pub const MVENDORID: u32 = 0xF11;
/// Machine architecture ID CSR address.
pub const MARCHID: u32 = 0xF12;
/// Machine implementation ID CSR address.
pub const MIMPID: u32 = 0xF13;
/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;
/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;
/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;
/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;
/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;
/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;
/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;
/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;
/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Trigger select CSR address.
pub const TSELECT: u32 = 0x7A0;
/// Trigger data 1 CSR address.
pub const TDATA1: u32 = 0x7A1;
/// Trigger data 2 CSR address.
pub const TDATA2: u32 = 0x7A2;

/// Machine cycle counter (low) CSR address.
pub const MCYCLE: u32 = 0xB00;
/// Machine retired-instruction counter (low) CSR address.
pub const MINSTRET: u32 = 0xB02;
/// Machine cycle counter (high) CSR address.
pub const MCYCLEH: u32 = 0xB80;
/// Machine retired-instruction counter (high) CSR address.
pub const MINSTRETH: u32 = 0xB82;

/// User cycle counter shadow (low) CSR address.
pub const CYCLE: u32 = 0xC00;
/// User retired-instruction counter shadow (low) CSR address.
pub const INSTRET: u32 = 0xC02;
/// User cycle counter shadow (high) CSR address.
pub const CYCLEH: u32 = 0xC80;
/// User retired-instruction counter shadow (high) CSR address.
pub const INSTRETH: u32 = 0xC82;

/// `mstatus.MIE`: global Machine interrupt enable.
pub const MSTATUS_MIE: u32 = 1 << 3;
/// `mstatus.MPIE`: MIE before the last trap.
pub const MSTATUS_MPIE: u32 = 1 << 7;
/// Shift of `mstatus.MPP`.
pub const MSTATUS_MPP_SHIFT: u32 = 11;
/// `mstatus.MPP`: privilege before the last trap.
pub const MSTATUS_MPP: u32 = 0b11 << MSTATUS_MPP_SHIFT;

/// Machine software interrupt pending/enable bit.
pub const MIP_MSIP: u32 = 1 << 3;
/// Machine timer interrupt pending/enable bit.
pub const MIP_MTIP: u32 = 1 << 7;
/// Machine external interrupt pending/enable bit.
pub const MIP_MEIP: u32 = 1 << 11;
/// Implemented bits of `mie` and `mip`.
pub const INTERRUPT_MASK: u32 = MIP_MSIP | MIP_MTIP | MIP_MEIP;

/// `misa.MXL` for a 32-bit base ISA.
pub const MISA_MXL_32: u32 = 1 << 30;
/// `misa` extension bit for I.
pub const MISA_EXT_I: u32 = 1 << (b'I' - b'A');
/// `misa` extension bit for M.
pub const MISA_EXT_M: u32 = 1 << (b'M' - b'A');
/// `misa` extension bit for U.
pub const MISA_EXT_U: u32 = 1 << (b'U' - b'A');

/// Returns `true` if the address lies in the read-only CSR space (`addr[11:10] == 0b11`).
pub const fn is_read_only(addr: u32) -> bool {
    (addr >> 10) & 0b11 == 0b11
}

/// Lowest privilege that may access the address (`addr[9:8]`).
pub const fn required_privilege(addr: u32) -> u32 {
    (addr >> 8) & 0b11
}

/// Architectural CSR state.
///
/// Fields are public for inspection; writes from software go through [`Csrs::write`],
/// which applies the WARL masks.
#[derive(Clone, Debug)]
pub struct Csrs {
    /// Machine status.
    pub mstatus: u32,
    /// Machine interrupt enable.
    pub mie: u32,
    /// Machine interrupt pending, mirrored from the interrupt input lines.
    pub mip: u32,
    /// Trap vector (direct mode).
    pub mtvec: u32,
    /// Scratch register.
    pub mscratch: u32,
    /// Exception program counter.
    pub mepc: u32,
    /// Trap cause.
    pub mcause: u32,
    /// Trap value.
    pub mtval: u32,
    /// Cycle counter.
    pub mcycle: u64,
    /// Retired-instruction counter.
    pub minstret: u64,
    /// Hardware triggers, when configured.
    pub triggers: Option<TriggerModule>,
    misa: u32,
    extra_csr: bool,
    user_mode: bool,
}

impl Csrs {
    /// Creates the CSR file in its reset state.
    ///
    /// `mtvec` resets to the reset address and `mstatus.MPP` to Machine.
    pub fn new(config: &Config) -> Self {
        let mut misa = MISA_MXL_32 | MISA_EXT_I;
        if config.isa.enable_rv32m {
            misa |= MISA_EXT_M;
        }
        if config.isa.enable_user_mode {
            misa |= MISA_EXT_U;
        }
        let triggers = config.trigger.enable.then(|| {
            TriggerModule::new(config.trigger.ntriggers, config.isa.enable_user_mode)
        });
        Self {
            mstatus: PrivilegeMode::Machine.to_bits() << MSTATUS_MPP_SHIFT,
            mie: 0,
            mip: 0,
            mtvec: config.core.reset_address & WORD_ALIGN_MASK,
            mscratch: 0,
            mepc: 0,
            mcause: 0,
            mtval: 0,
            mcycle: 0,
            minstret: 0,
            triggers,
            misa,
            extra_csr: config.isa.enable_extra_csr,
            user_mode: config.isa.enable_user_mode,
        }
    }

    /// Returns `true` if the CSR exists in this configuration.
    pub const fn is_implemented(&self, addr: u32) -> bool {
        match addr {
            MSTATUS | MIE | MIP | MTVEC | MSCRATCH | MEPC | MCAUSE | MTVAL => true,
            MISA | MVENDORID | MARCHID | MIMPID | MHARTID | MCYCLE | MCYCLEH | MINSTRET
            | MINSTRETH => self.extra_csr,
            CYCLE | CYCLEH | INSTRET | INSTRETH => self.extra_csr && self.user_mode,
            TSELECT | TDATA1 | TDATA2 => self.triggers.is_some(),
            _ => false,
        }
    }

    /// Checks whether a CSR instruction may perform the access.
    ///
    /// The access is invalid if the CSR is not implemented, if it writes a read-only
    /// address, or if the address requires more privilege than `privilege`.
    pub const fn check_access(&self, addr: u32, write: bool, privilege: PrivilegeMode) -> bool {
        self.is_implemented(addr)
            && !(write && is_read_only(addr))
            && required_privilege(addr) <= privilege.to_bits()
    }

    /// Reads a CSR.
    ///
    /// # Returns
    ///
    /// The current value with reserved bits reading as zero, or `None` if the CSR does
    /// not exist in this configuration.
    pub fn read(&self, addr: u32) -> Option<u32> {
        if !self.is_implemented(addr) {
            return None;
        }
        let val = match addr {
            MSTATUS => self.mstatus,
            MIE => self.mie,
            MIP => self.mip,
            MTVEC => self.mtvec,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MISA => self.misa,
            MCYCLE | CYCLE => self.mcycle as u32,
            MCYCLEH | CYCLEH => (self.mcycle >> 32) as u32,
            MINSTRET | INSTRET => self.minstret as u32,
            MINSTRETH | INSTRETH => (self.minstret >> 32) as u32,
            TSELECT => self.triggers.as_ref().map_or(0, TriggerModule::tselect),
            TDATA1 => self.triggers.as_ref().map_or(0, TriggerModule::tdata1),
            TDATA2 => self.triggers.as_ref().map_or(0, TriggerModule::tdata2),
            _ => 0,
        };
        Some(val)
    }

    /// Writes a CSR, keeping only its legal bits.
    ///
    /// Writes to unimplemented or read-only registers are ignored; callers check access
    /// rights first with [`Csrs::check_access`].
    pub fn write(&mut self, addr: u32, val: u32) {
        if !self.is_implemented(addr) {
            return;
        }
        match addr {
            MSTATUS => {
                let mpp = self.legal_mpp(PrivilegeMode::from_bits(val >> MSTATUS_MPP_SHIFT));
                self.mstatus = (val & (MSTATUS_MIE | MSTATUS_MPIE))
                    | (mpp.to_bits() << MSTATUS_MPP_SHIFT);
            }
            MIE => self.mie = val & INTERRUPT_MASK,
            MTVEC => self.mtvec = val & WORD_ALIGN_MASK,
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & WORD_ALIGN_MASK,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MCYCLE => self.mcycle = (self.mcycle & !0xFFFF_FFFF) | val as u64,
            MCYCLEH => self.mcycle = (self.mcycle & 0xFFFF_FFFF) | ((val as u64) << 32),
            MINSTRET => self.minstret = (self.minstret & !0xFFFF_FFFF) | val as u64,
            MINSTRETH => self.minstret = (self.minstret & 0xFFFF_FFFF) | ((val as u64) << 32),
            TSELECT => {
                if let Some(t) = self.triggers.as_mut() {
                    t.set_tselect(val);
                }
            }
            TDATA1 => {
                if let Some(t) = self.triggers.as_mut() {
                    t.set_tdata1(val);
                }
            }
            TDATA2 => {
                if let Some(t) = self.triggers.as_mut() {
                    t.set_tdata2(val);
                }
            }
            // mip mirrors the interrupt lines; misa, the ID registers, and the user
            // counter shadows are read-only.
            _ => {}
        }
    }

    /// Maps a requested previous-privilege value to one the core implements.
    pub const fn legal_mpp(&self, mode: PrivilegeMode) -> PrivilegeMode {
        match mode {
            PrivilegeMode::User if self.user_mode => PrivilegeMode::User,
            _ => PrivilegeMode::Machine,
        }
    }

    /// Returns `mstatus.MPP`.
    pub const fn mpp(&self) -> PrivilegeMode {
        PrivilegeMode::from_bits(self.mstatus >> MSTATUS_MPP_SHIFT)
    }

    /// Replaces `mstatus.MPP`.
    pub const fn set_mpp(&mut self, mode: PrivilegeMode) {
        let mode = self.legal_mpp(mode);
        self.mstatus = (self.mstatus & !MSTATUS_MPP) | (mode.to_bits() << MSTATUS_MPP_SHIFT);
    }

    /// Returns `true` if User mode is implemented.
    pub const fn user_mode(&self) -> bool {
        self.user_mode
    }
}
