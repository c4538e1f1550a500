//! RISC-V architectural state.
//!
//! This module contains the state that instructions commit to. It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions, WARL masks, and access checks.
//! 2. **GPRs:** General-Purpose Register file implementation.
//! 3. **Modes:** Privilege mode definitions.
//! 4. **Traps:** The trap controller that owns the CSR file and the current privilege.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Privilege mode definitions.
pub mod mode;

/// Trap entry/return and interrupt recognition.
pub mod trap;
