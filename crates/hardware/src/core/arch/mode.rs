//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels implemented by the core. It implements the following:
//! 1. **Mode Classification:** User (U) and Machine (M) modes; Supervisor mode is not implemented.
//! 2. **Serialization:** Conversion between the `mstatus.MPP` encoding and enum variants.
//! 3. **Observability:** Human-readable naming and display formatting for privilege states.

/// RISC-V privilege mode levels.
///
/// Machine mode is always present. User mode exists only when the core is configured
/// with `enable_user_mode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    ///
    /// Lowest privilege level for application code.
    User = 0,

    /// Machine mode (M-mode).
    ///
    /// Highest privilege level; the core resets into it.
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts a two-bit `MPP` field to a privilege mode.
    ///
    /// Encodings other than User map to Machine, matching the WARL behaviour of `MPP`.
    pub const fn from_bits(val: u32) -> Self {
        match val & 0b11 {
            0 => Self::User,
            _ => Self::Machine,
        }
    }

    /// Converts a privilege mode to its two-bit encoding.
    pub const fn to_bits(self) -> u32 {
        self as u32
    }

    /// Returns the human-readable name of the privilege mode.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Machine => "Machine",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
