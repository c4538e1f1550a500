//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the six stages of the
//! instruction pipeline. It includes:
//! 1. **Fetch-Address / Fetch-Data:** Predicts the next PC and retrieves instruction words.
//! 2. **Decode:** Decodes instructions into control signals and reads operands.
//! 3. **Execute:** Performs ALU and multi-cycle operations and resolves control flow.
//! 4. **Memory:** Handles data load and store operations and `fence.i`.
//! 5. **Writeback:** Commits results to the register file and handles traps.
//!
//! Stages are evaluated from Writeback back to Fetch-Address each cycle, so an entry
//! only advances into a stage register that its occupant has already vacated.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Fetch-Address and Fetch-Data stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry points (A and F stages).
pub use fetch::{fetch_address_stage, fetch_stage};
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
