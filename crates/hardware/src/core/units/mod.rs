//! Execution units and functional components.
//!
//! This module contains the units the pipeline stages drive: the ALU, the
//! multi-cycle multiplier/divider, branch prediction, the cache engine, the fetch
//! and load/store units that own the bus master ports, and the hardware triggers.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch prediction unit.
pub mod bru;

/// Cache engine with LRU replacement and a write buffer.
pub mod cache;

/// Fetch unit (instruction cache and instruction port).
pub mod fetch;

/// Load/Store Unit (data cache and data port).
pub mod lsu;

/// Multi-cycle multiplier and divider for the M extension.
pub mod muldiv;

/// Address/data match triggers.
pub mod trigger;
