//! Load/Store Unit (LSU).
//!
//! The LSU owns the data cache, the write buffer and the data master port. It performs:
//! 1. **Cached Loads:** Hits return in the cycle they are presented; misses are served
//!    from the write buffer when it covers the access, otherwise by a line refill.
//! 2. **Cached Stores:** Write-through, no write-allocate. A hit updates the line and
//!    every cacheable store enters the write buffer, completing immediately.
//! 3. **Uncached Accesses:** A single classic cycle per access; bus errors become precise
//!    access faults.
//! 4. **Port Arbitration:** Write buffer, refill engine and uncached path share the data
//!    port through an [`Arbiter`] in that priority order, so buffered stores always reach
//!    memory before any later read on this port.
//!
//! Submodules:
//! - [`format`]: byte selects, store replication and load extension.

/// Byte-lane formatting and alignment checks.
pub mod format;

use tracing::trace;

use self::format::{byte_select, load_extend, store_data};
use crate::common::error::Trap;
use crate::config::CacheConfig;
use crate::core::pipeline::signals::MemWidth;
use crate::core::units::cache::Cache;
use crate::core::units::cache::write_buffer::WriteBuffer;
use crate::soc::arbiter::Arbiter;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// Data-port requesters, in priority order.
const SRC_WRITE_BUFFER: usize = 0;
const SRC_REFILL: usize = 1;
const SRC_UNCACHED: usize = 2;

/// A memory operation presented by the Memory stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemOp {
    /// Sequence number of the instruction.
    pub seq: u64,
    /// Effective address (already checked for alignment).
    pub addr: u32,
    /// Access width.
    pub width: MemWidth,
    /// Sign-extend loaded data.
    pub signed: bool,
    /// Store value (`None` for loads).
    pub store: Option<u32>,
}

/// Progress of a memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemStatus {
    /// Not finished; present the operation again next cycle.
    Pending,
    /// Finished. Loads carry the extended value, stores carry zero.
    Done(u32),
    /// Finished with an access fault.
    Fault(Trap),
}

/// An uncached single-beat access in flight.
#[derive(Clone, Copy, Debug)]
struct Uncached {
    seq: u64,
    req: BusRequest,
    resp: Option<BusResponse>,
}

/// Load/Store Unit for memory operations.
#[derive(Clone, Debug)]
pub struct LoadStoreUnit {
    /// Data cache.
    pub dcache: Cache,
    /// Store queue in front of the data port.
    pub wbuf: WriteBuffer,
    uncached: Option<Uncached>,
    arbiter: Arbiter,
}

impl LoadStoreUnit {
    /// Creates the LSU with an empty data cache and write buffer.
    ///
    /// The write buffer holds one line's worth of stores.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            dcache: Cache::new("dcache", config),
            wbuf: WriteBuffer::new(config.nwords),
            uncached: None,
            arbiter: Arbiter::new(),
        }
    }

    /// Returns `true` when nothing is buffered or in flight on the data port.
    pub fn is_idle(&self) -> bool {
        self.wbuf.is_empty() && !self.dcache.refill_active() && self.uncached.is_none()
    }

    /// Presents a memory operation for one cycle.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation; it is presented every cycle until it finishes.
    /// * `mapped` - Whether any slave decodes `op.addr`. Cacheable stores complete
    ///   before reaching the bus, so an unmapped target is faulted here.
    pub fn access(&mut self, op: &MemOp, mapped: bool) -> MemStatus {
        if let Some(u) = self.uncached {
            if u.seq != op.seq {
                return MemStatus::Pending;
            }
            let Some(resp) = u.resp else {
                return MemStatus::Pending;
            };
            self.uncached = None;
            return match (resp.err, op.store) {
                (true, Some(_)) => MemStatus::Fault(Trap::StoreAccessFault(op.addr)),
                (true, None) => MemStatus::Fault(Trap::LoadAccessFault(op.addr)),
                (false, Some(_)) => MemStatus::Done(0),
                (false, None) => {
                    MemStatus::Done(load_extend(resp.dat_r, op.addr, op.width, op.signed))
                }
            };
        }

        let sel = byte_select(op.addr, op.width);
        if !self.dcache.is_cacheable(op.addr) {
            let req = match op.store {
                Some(v) => BusRequest::write(op.addr & !0b11, store_data(v, op.width), sel),
                None => BusRequest {
                    sel,
                    ..BusRequest::read(op.addr & !0b11)
                },
            };
            self.uncached = Some(Uncached {
                seq: op.seq,
                req,
                resp: None,
            });
            return MemStatus::Pending;
        }

        match op.store {
            Some(v) => self.cached_store(op, v, sel, mapped),
            None => self.cached_load(op, sel),
        }
    }

    fn cached_load(&mut self, op: &MemOp, sel: u8) -> MemStatus {
        if let Some(word) = self.dcache.lookup(op.addr) {
            return MemStatus::Done(load_extend(word, op.addr, op.width, op.signed));
        }
        if let Some(word) = self.wbuf.forward(op.addr, sel) {
            trace!(addr = format_args!("{:#010x}", op.addr), "load forwarded from write buffer");
            return MemStatus::Done(load_extend(word, op.addr, op.width, op.signed));
        }
        if self.dcache.refill_active() {
            return MemStatus::Pending;
        }
        if self.dcache.take_refill_error(op.addr) {
            return MemStatus::Fault(Trap::LoadAccessFault(op.addr));
        }
        self.dcache.start_refill(op.addr);
        MemStatus::Pending
    }

    fn cached_store(&mut self, op: &MemOp, value: u32, sel: u8, mapped: bool) -> MemStatus {
        if !mapped {
            return MemStatus::Fault(Trap::StoreAccessFault(op.addr));
        }
        if self.wbuf.is_full() {
            return MemStatus::Pending;
        }
        let data = store_data(value, op.width);
        let hit = self.dcache.write_hit(op.addr, data, sel);
        let _ = self.wbuf.push(op.addr, data, sel);
        trace!(
            addr = format_args!("{:#010x}", op.addr),
            hit,
            queued = self.wbuf.len(),
            "store buffered"
        );
        MemStatus::Done(0)
    }

    /// Beat driven on the data port this cycle.
    pub fn bus_request(&mut self) -> Option<BusRequest> {
        let pending_uncached = self.uncached.filter(|u| u.resp.is_none());
        let requests = [
            !self.wbuf.is_empty(),
            self.dcache.refill_active(),
            pending_uncached.is_some(),
        ];
        match self.arbiter.arbitrate(&requests)? {
            SRC_WRITE_BUFFER => self.wbuf.drain_request(),
            SRC_REFILL => self.dcache.refill_request(),
            _ => pending_uncached.map(|u| u.req),
        }
    }

    /// Delivers the data-port response for this cycle.
    ///
    /// # Returns
    ///
    /// The word address of a write that completed on the bus this cycle, for
    /// instruction-cache snooping.
    pub fn bus_response(&mut self, resp: Option<BusResponse>) -> Option<u32> {
        let resp = resp?;
        let mut written = None;
        match self.arbiter.owner()? {
            SRC_WRITE_BUFFER => {
                if let Some(entry) = self.wbuf.drain_response(resp) {
                    self.arbiter.release();
                    if resp.ack {
                        written = Some(entry.addr);
                    }
                }
            }
            SRC_REFILL => {
                if self.dcache.refill_response(resp).is_some() {
                    self.arbiter.release();
                }
            }
            SRC_UNCACHED => {
                if let Some(u) = self.uncached.as_mut() {
                    u.resp = Some(resp);
                    if u.req.we && resp.ack {
                        written = Some(u.req.adr);
                    }
                }
                self.arbiter.release();
            }
            _ => {}
        }
        written
    }
}
