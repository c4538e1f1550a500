//! System-on-Chip (SoC) Components.
//!
//! This module organizes the bus side of the model: the Wishbone signal bundles, the
//! slave interface, the arbiter shared by every multiplexing point, the address decoder,
//! and the RAM slave.

/// Fixed-priority arbiter with grant holding.
pub mod arbiter;

/// Address decoder and master arbitration.
pub mod interconnect;

/// RAM slave with wait states and burst support.
pub mod memory;

/// Slave trait definitions.
pub mod traits;

/// Wishbone request/response signals and burst addressing.
pub mod wishbone;

pub use arbiter::Arbiter;
pub use interconnect::{Interconnect, Port};
pub use memory::Ram;
pub use traits::Slave;
