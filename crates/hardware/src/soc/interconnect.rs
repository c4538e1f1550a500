//! System interconnect.
//!
//! This module connects the core's two Wishbone master ports to the slaves. It provides:
//! 1. **Arbitration:** A priority arbiter sharing the single bus between the data port
//!    (higher priority) and the instruction port.
//! 2. **Address Decoding:** An ordered `{base, width}` table; the first entry whose upper
//!    address bits match wins.
//! 3. **Error Synthesis:** Beats to unmapped addresses are terminated with `err` in the
//!    same cycle.

use tracing::{debug, trace};

use crate::soc::arbiter::Arbiter;
use crate::soc::traits::Slave;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// Master ports of the core, in arbitration priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    /// Load/store unit.
    Data = 0,
    /// Fetch unit.
    Instruction = 1,
}

/// Number of master ports.
pub const NUM_PORTS: usize = 2;

/// One address decoder entry.
struct Window {
    base: u32,
    /// Number of low address bits decoded by the slave itself.
    width: u32,
    slave: Box<dyn Slave>,
}

impl Window {
    const fn matches(&self, addr: u32) -> bool {
        self.high_bits(addr) == self.high_bits(self.base)
    }

    const fn high_bits(&self, addr: u32) -> u32 {
        if self.width >= 32 {
            0
        } else {
            addr >> self.width
        }
    }

    const fn offset(&self, addr: u32) -> u32 {
        if self.width >= 32 {
            addr
        } else {
            addr & ((1 << self.width) - 1)
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("base", &format_args!("{:#010x}", self.base))
            .field("width", &self.width)
            .field("slave", &self.slave.name())
            .finish()
    }
}

/// Shared bus with address decoder and master arbiter.
#[derive(Debug, Default)]
pub struct Interconnect {
    windows: Vec<Window>,
    arbiter: Arbiter,
}

impl Interconnect {
    /// Creates an interconnect with an empty decoder table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slave to the decoder table.
    ///
    /// # Arguments
    ///
    /// * `base` - Window base address.
    /// * `width` - Number of low address bits inside the window (the window spans
    ///   `1 << width` bytes).
    /// * `slave` - The slave mapped there.
    ///
    /// Entries are matched in insertion order.
    pub fn attach(&mut self, base: u32, width: u32, slave: Box<dyn Slave>) {
        debug!(
            base = format_args!("{base:#010x}"),
            width,
            slave = slave.name(),
            "slave attached"
        );
        self.windows.push(Window { base, width, slave });
    }

    fn decode(&self, addr: u32) -> Option<usize> {
        self.windows.iter().position(|w| w.matches(addr))
    }

    /// Returns `true` if a slave is mapped at `addr`.
    pub fn is_mapped(&self, addr: u32) -> bool {
        self.decode(addr).is_some()
    }

    /// Returns the slave mapped at `addr` and the slave-relative offset.
    pub fn slave_mut(&mut self, addr: u32) -> Option<(&mut dyn Slave, u32)> {
        let idx = self.decode(addr)?;
        let window = self.windows.get_mut(idx)?;
        let offset = window.offset(addr);
        Some((window.slave.as_mut(), offset))
    }

    /// Runs one bus clock cycle.
    ///
    /// # Arguments
    ///
    /// * `requests` - The beat each master port presents this cycle, indexed by [`Port`].
    ///
    /// # Returns
    ///
    /// The response delivered to each port. Ports that were not granted, or whose slave
    /// inserted a wait state, receive `None`.
    pub fn tick(
        &mut self,
        requests: [Option<BusRequest>; NUM_PORTS],
    ) -> [Option<BusResponse>; NUM_PORTS] {
        let mut responses = [None; NUM_PORTS];
        let active = requests.map(|r| r.is_some());
        let Some(port) = self.arbiter.arbitrate(&active) else {
            return responses;
        };
        let Some(req) = requests.get(port).copied().flatten() else {
            return responses;
        };

        let resp = match self.decode(req.adr) {
            Some(idx) => self.windows.get_mut(idx).and_then(|w| {
                let local = BusRequest {
                    adr: w.offset(req.adr),
                    ..req
                };
                w.slave.access(&local)
            }),
            None => {
                debug!(adr = format_args!("{:#010x}", req.adr), port, "decode miss");
                Some(BusResponse::error())
            }
        };

        if let Some(r) = resp {
            trace!(
                port,
                adr = format_args!("{:#010x}", req.adr),
                we = req.we,
                cti = ?req.cti,
                ack = r.ack,
                err = r.err,
                "bus beat"
            );
            if r.err || req.is_last() {
                self.arbiter.release();
            }
        }
        if let Some(slot) = responses.get_mut(port) {
            *slot = resp;
        }
        responses
    }
}
