//! Common types and constants shared by every part of the core model.
//!
//! This module provides:
//! 1. **Constants:** Instruction size, register count, and Wishbone word geometry.
//! 2. **Error Handling:** Architectural trap representation and internal-model error types.

/// Core-wide constants.
pub mod constants;

/// Trap definitions and internal-model error types.
pub mod error;

pub use error::{ConfigError, LoadError, Trap};
