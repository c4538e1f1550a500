//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the RV32I/RV32M and privileged encodings, field extraction, and the decoder
//! that turns a raw fetch word into an [`Instruction`](decode::Instruction) record.
//!
//! # Modules
//!
//! * `opcodes`: Major opcodes and the funct3/funct7/funct12 codes they use.
//! * `instruction`: Field and immediate extraction from 32-bit encodings.
//! * `decode`: The Decode-stage instruction decoder.

/// Instruction decoding into control signals.
pub mod decode;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Opcode and function-code constants.
pub mod opcodes;
