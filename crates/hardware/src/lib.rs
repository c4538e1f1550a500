//! Cycle-stepped model of the Bellatrix RV32I[M] core.
//!
//! This crate models a six-stage in-order RISC-V pipeline and the bus it masters:
//! 1. **Core:** Fetch-Address, Fetch-Data, Decode, Execute, Memory and Writeback stages
//!    with forwarding, a branch predictor, and precise traps.
//! 2. **Memory:** Optional instruction and data caches with burst refill, and a write
//!    buffer in front of the data port.
//! 3. **ISA:** RV32I, the optional multi-cycle M extension, Zicsr, and Machine/User modes
//!    with hardware triggers.
//! 4. **SoC:** Wishbone B4 signals, an arbitrated address decoder, and a RAM slave.
//! 5. **Simulation:** A driver owning the core and the bus, an image loader, and
//!    statistics.
//!
//! # Example
//!
//! ```
//! use bellatrix_core::soc::{Interconnect, Ram};
//! use bellatrix_core::{Config, Simulator};
//!
//! let mut bus = Interconnect::new();
//! bus.attach(0x8000_0000, 16, Box::new(Ram::new("ram", 1 << 16, 0)));
//!
//! let mut sim = Simulator::new(&Config::default(), bus).unwrap();
//! // addi x1, x0, 42 ; jal x0, 0
//! let image = [0x02a0_0093u32, 0x0000_006f];
//! let bytes: Vec<u8> = image.iter().flat_map(|w| w.to_le_bytes()).collect();
//! sim.load_image(0x8000_0000, &bytes).unwrap();
//!
//! sim.run(50);
//! assert_eq!(sim.cpu.regs.read(1), 42);
//! ```

/// Common types and constants (traps, errors, geometry).
pub mod common;
/// Core configuration (defaults, validation, JSON loading).
pub mod config;
/// CPU core (pipeline, arch state, execution units).
pub mod core;
/// Instruction set (opcodes, field extraction, decoder).
pub mod isa;
/// Simulator driver and image loader.
pub mod sim;
/// System-on-chip side (Wishbone, arbiter, interconnect, RAM).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds the pipeline, caches and trap controller.
pub use crate::core::Cpu;
/// Top-level driver owning the core and its interconnect.
pub use crate::sim::Simulator;
