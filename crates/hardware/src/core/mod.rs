//! Core processor implementation.
//!
//! This module contains the CPU implementation including the instruction
//! pipeline, execution units, architectural state, and the per-cycle
//! orchestration that coordinates them.

/// Architectural state (CSRs, register file, privilege modes, trap controller).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Instruction pipeline implementation (stages, latches, hazards, signals).
pub mod pipeline;

/// Execution units (ALU, mul/div, branch predictor, caches, fetch, LSU, triggers).
pub mod units;

pub use self::cpu::Cpu;
