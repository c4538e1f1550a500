//! Simulation utilities and program loading.
//!
//! Provides the [`Simulator`], which ties the core to its interconnect and interrupt
//! inputs, and a loader for raw memory images.

/// Raw image loading from disk.
pub mod loader;

/// Top-level simulator (core, bus, interrupt lines).
pub mod simulator;

pub use simulator::Simulator;
