//! Global Core Constants.
//!
//! This module defines constants used across the model. It includes:
//! 1. **Instruction Constants:** Instruction width.
//! 2. **Register Constants:** Size of the integer register file.
//! 3. **Bus Constants:** Word size and byte-select widths of the 32-bit Wishbone ports.

/// Size of an RV32 instruction in bytes. The core does not implement RVC.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Number of integer registers.
pub const NUM_GPRS: usize = 32;

/// Bytes in one bus word.
pub const WORD_BYTES: u32 = 4;

/// Byte-select mask covering the full bus word.
pub const SEL_WORD: u8 = 0b1111;

/// Mask that clears the byte offset of an address.
pub const WORD_ALIGN_MASK: u32 = !0b11;

/// Default reset vector (start of the main memory window).
pub const DEFAULT_RESET_ADDRESS: u32 = 0x8000_0000;
