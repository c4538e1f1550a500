//! Trap and internal-model error definitions.
//!
//! This module defines the two error channels of the model. It provides:
//! 1. **Trap Representation:** Every synchronous exception and asynchronous interrupt the
//!    core can take, with its cause code and trap value.
//! 2. **Configuration Errors:** Geometry and feature violations rejected before the first tick.
//! 3. **Loader Errors:** Failures while reading or placing a memory image.
//!
//! Traps never leave the core as `Err` values: they travel inside the stage registers and
//! are consumed by the trap controller at Writeback. The `thiserror` types cover the
//! internal-model failures only.

use std::fmt;

use thiserror::Error;

/// Bit set in `mcause` for interrupts.
pub const INTERRUPT_BIT: u32 = 1 << 31;

/// RISC-V trap types representing exceptions and interrupts.
///
/// The associated value of each exception is the value written to `mtval` when the trap
/// is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned exception.
    ///
    /// Raised by a taken branch or jump whose target is not word aligned.
    /// The associated value is the misaligned target.
    InstructionAddressMisaligned(u32),

    /// Instruction access fault exception.
    ///
    /// Raised when the fetch of an instruction ends with a bus error.
    /// The associated value is the faulting address.
    InstructionAccessFault(u32),

    /// Illegal instruction exception.
    ///
    /// Raised for encodings the decoder does not recognise and for invalid CSR accesses.
    /// The associated value is the instruction encoding.
    IllegalInstruction(u32),

    /// Breakpoint exception.
    ///
    /// Raised by `ebreak` (value: the PC) or by a hardware trigger hit (value: the matched
    /// PC or effective address).
    Breakpoint(u32),

    /// Load address misaligned exception.
    LoadAddressMisaligned(u32),

    /// Load access fault exception.
    LoadAccessFault(u32),

    /// Store address misaligned exception.
    StoreAddressMisaligned(u32),

    /// Store access fault exception.
    StoreAccessFault(u32),

    /// Environment call from user mode.
    EnvironmentCallFromUMode,

    /// Environment call from machine mode.
    EnvironmentCallFromMMode,

    /// Machine software interrupt.
    MachineSoftwareInterrupt,

    /// Machine timer interrupt.
    MachineTimerInterrupt,

    /// Machine external interrupt.
    MachineExternalInterrupt,
}

impl Trap {
    /// Returns `true` for asynchronous interrupts.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::MachineSoftwareInterrupt
                | Self::MachineTimerInterrupt
                | Self::MachineExternalInterrupt
        )
    }

    /// Returns the exception or interrupt code, without the interrupt bit.
    pub const fn code(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(_) => 0,
            Self::InstructionAccessFault(_) => 1,
            Self::IllegalInstruction(_) => 2,
            Self::Breakpoint(_) => 3,
            Self::LoadAddressMisaligned(_) => 4,
            Self::LoadAccessFault(_) => 5,
            Self::StoreAddressMisaligned(_) => 6,
            Self::StoreAccessFault(_) => 7,
            Self::EnvironmentCallFromUMode => 8,
            Self::EnvironmentCallFromMMode => 11,
            Self::MachineSoftwareInterrupt => 3,
            Self::MachineTimerInterrupt => 7,
            Self::MachineExternalInterrupt => 11,
        }
    }

    /// Returns the full `mcause` value, including the interrupt bit.
    pub const fn cause(&self) -> u32 {
        if self.is_interrupt() {
            INTERRUPT_BIT | self.code()
        } else {
            self.code()
        }
    }

    /// Returns the value written to `mtval` when the trap is taken.
    pub const fn tval(&self) -> u32 {
        match *self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::IllegalInstruction(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v) => v,
            Self::EnvironmentCallFromUMode
            | Self::EnvironmentCallFromMMode
            | Self::MachineSoftwareInterrupt
            | Self::MachineTimerInterrupt
            | Self::MachineExternalInterrupt => 0,
        }
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Self::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Self::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#010x})"),
            Self::Breakpoint(val) => write!(f, "Breakpoint({val:#x})"),
            Self::LoadAddressMisaligned(addr) => write!(f, "LoadAddressMisaligned({addr:#x})"),
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::StoreAddressMisaligned(addr) => write!(f, "StoreAddressMisaligned({addr:#x})"),
            Self::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Self::EnvironmentCallFromUMode => write!(f, "EnvironmentCallFromUMode"),
            Self::EnvironmentCallFromMMode => write!(f, "EnvironmentCallFromMMode"),
            Self::MachineSoftwareInterrupt => write!(f, "MachineSoftwareInterrupt"),
            Self::MachineTimerInterrupt => write!(f, "MachineTimerInterrupt"),
            Self::MachineExternalInterrupt => write!(f, "MachineExternalInterrupt"),
        }
    }
}

impl std::error::Error for Trap {}

/// Configuration rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The reset vector must be a legal instruction address.
    #[error("reset address {0:#010x} is not word aligned")]
    MisalignedResetAddress(u32),

    /// The predictor is indexed by PC bits, so its size must be a power of two.
    #[error("predictor size {0} is not a power of two")]
    PredictorSize(usize),

    /// Cache line count must be a non-zero power of two.
    #[error("{cache}: line count {nlines} is not a power of two")]
    LineCount {
        /// Which cache was rejected.
        cache: &'static str,
        /// The offending line count.
        nlines: usize,
    },

    /// Words per line must be 4, 8 or 16 (one of the Wishbone wrap burst sizes).
    #[error("{cache}: {nwords} words per line is unsupported (expected 4, 8 or 16)")]
    LineWords {
        /// Which cache was rejected.
        cache: &'static str,
        /// The offending words-per-line value.
        nwords: usize,
    },

    /// Associativity must be 1 or 2.
    #[error("{cache}: associativity {nways} is unsupported (expected 1 or 2)")]
    Ways {
        /// Which cache was rejected.
        cache: &'static str,
        /// The offending way count.
        nways: usize,
    },

    /// The cacheable window is empty.
    #[error("{cache}: cacheable range [{start:#010x}, {end:#010x}] is empty")]
    CacheableRange {
        /// Which cache was rejected.
        cache: &'static str,
        /// First cacheable address.
        start: u32,
        /// Last cacheable address.
        end: u32,
    },

    /// Trigger count outside the supported range.
    #[error("trigger count {count} is outside 1..={max}")]
    TriggerCount {
        /// Requested number of triggers.
        count: usize,
        /// Largest supported number of triggers.
        max: usize,
    },

    /// The JSON document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while loading a memory image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("failed to read image '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No slave is mapped at the load address.
    #[error("no slave is mapped at {0:#010x}")]
    Unmapped(u32),

    /// The image does not fit in the slave it targets.
    #[error("image of {len} bytes at {addr:#010x} does not fit in '{slave}'")]
    OutOfRange {
        /// Name of the target slave.
        slave: String,
        /// Load address.
        addr: u32,
        /// Image length in bytes.
        len: usize,
    },
}
