//! Slave trait for Wishbone-attached components.
//!
//! This module defines the `Slave` trait implemented by every component the
//! interconnect can route to. It provides:
//! 1. **Identification:** `name` for diagnostics and loader errors.
//! 2. **Access:** One beat per call, answered with `ack`/`err` or a wait state.
//! 3. **Backdoor:** Direct image loading that bypasses the bus protocol.

use crate::common::error::LoadError;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// Trait for Wishbone slaves attached to the interconnect.
///
/// `access` receives slave-relative addresses: the decoder strips the window base before
/// forwarding a beat.
pub trait Slave: Send {
    /// Returns a short name for this slave (e.g., `"ram"`).
    fn name(&self) -> &str;

    /// Presents one beat to the slave for one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `req` - The beat, with `adr` relative to the slave's base.
    ///
    /// # Returns
    ///
    /// The terminating response, or `None` to insert a wait state. A master keeps
    /// presenting the same beat until it receives a response.
    fn access(&mut self, req: &BusRequest) -> Option<BusResponse>;

    /// Writes an image directly into the slave's storage.
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset relative to the slave's base.
    /// * `data` - The bytes to store.
    ///
    /// # Errors
    ///
    /// [`LoadError::OutOfRange`] if the image does not fit.
    fn load(&mut self, offset: u32, data: &[u8]) -> Result<(), LoadError>;
}
