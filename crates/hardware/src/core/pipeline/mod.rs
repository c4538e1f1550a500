//! Instruction pipeline implementation.
//!
//! This module contains the implementation of the six-stage in-order pipeline
//! (Fetch-Address, Fetch-Data, Decode, Execute, Memory, Writeback).
//! It includes the following components:
//! 1. **Hazards:** Operand forwarding and Decode stall detection.
//! 2. **Latches:** The entry held by each stage register.
//! 3. **Signals:** Control signals generated during instruction decoding.
//! 4. **Stages:** The per-stage logic evaluated once per cycle.

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Stage register entries (F, D, X, M, W).
pub mod latches;

/// Control signals generated during instruction decode.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;
