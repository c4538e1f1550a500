//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for RV32.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`), 32 bits wide.
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Debugging:** Provides a snapshot and a formatted dump of the complete register state.

use std::fmt::Write as _;

use crate::common::constants::NUM_GPRS;

/// General-Purpose Register file.
///
/// Written only by the Writeback stage; read by Decode with forwarding overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; NUM_GPRS],
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_GPRS],
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The value stored in the register. Register `x0` always returns 0.
    pub const fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx & 0x1F] }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// Writes to `x0` are discarded.
    pub const fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx & 0x1F] = val;
        }
    }

    /// Returns a copy of all 32 registers.
    pub const fn snapshot(&self) -> [u32; NUM_GPRS] {
        self.regs
    }

    /// Formats the register file in pairs, for trace output.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for i in (0..NUM_GPRS).step_by(2) {
            let _ = writeln!(
                out,
                "x{:<2}={:#010x} x{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1]
            );
        }
        out
    }
}
