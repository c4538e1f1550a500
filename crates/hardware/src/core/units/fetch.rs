//! Fetch Unit.
//!
//! Owns the instruction cache and the instruction master port. The Fetch-Data stage
//! presents the PC of its instruction every cycle until the word is available:
//! 1. **Cached Fetch:** Hits return immediately; a miss starts a critical-word-first
//!    refill of the line and the fetch is retried once the line is valid.
//! 2. **Uncached Fetch:** One classic read per instruction. A fetch abandoned by a
//!    redirect still completes on the bus (a cycle cannot be withdrawn), but its data
//!    is discarded because its sequence number no longer matches.
//! 3. **Coherence:** `fence.i` invalidates the whole cache; stores seen on the data port
//!    invalidate the matching line.

use tracing::trace;

use crate::common::error::Trap;
use crate::config::CacheConfig;
use crate::core::units::cache::Cache;
use crate::soc::arbiter::Arbiter;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// Instruction-port requesters, in priority order.
const SRC_REFILL: usize = 0;
const SRC_UNCACHED: usize = 1;

/// Progress of an instruction fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    /// Not available yet.
    Pending,
    /// The instruction word.
    Ready(u32),
    /// The fetch terminated with a bus error.
    Fault(Trap),
}

#[derive(Clone, Copy, Debug)]
struct UncachedFetch {
    seq: u64,
    adr: u32,
    resp: Option<BusResponse>,
}

/// Instruction fetch engine.
#[derive(Clone, Debug)]
pub struct FetchUnit {
    /// Instruction cache.
    pub icache: Cache,
    uncached: Option<UncachedFetch>,
    arbiter: Arbiter,
}

impl FetchUnit {
    /// Creates the fetch unit with an empty instruction cache.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            icache: Cache::new("icache", config),
            uncached: None,
            arbiter: Arbiter::new(),
        }
    }

    /// Presents the fetch of instruction `seq` at `pc` for one cycle.
    pub fn fetch(&mut self, pc: u32, seq: u64) -> FetchStatus {
        if self.icache.is_cacheable(pc) {
            if let Some(word) = self.icache.lookup(pc) {
                return FetchStatus::Ready(word);
            }
            if self.icache.refill_active() {
                return FetchStatus::Pending;
            }
            if self.icache.take_refill_error(pc) {
                return FetchStatus::Fault(Trap::InstructionAccessFault(pc));
            }
            self.icache.start_refill(pc);
            return FetchStatus::Pending;
        }

        match self.uncached {
            Some(u) if u.seq == seq => match u.resp {
                Some(resp) => {
                    self.uncached = None;
                    if resp.err {
                        FetchStatus::Fault(Trap::InstructionAccessFault(pc))
                    } else {
                        FetchStatus::Ready(resp.dat_r)
                    }
                }
                None => FetchStatus::Pending,
            },
            // A stale fetch still owns the port until its cycle terminates.
            Some(u) if u.resp.is_none() => FetchStatus::Pending,
            _ => {
                if let Some(stale) = self.uncached {
                    trace!(seq = stale.seq, "discarding abandoned fetch");
                }
                self.uncached = Some(UncachedFetch {
                    seq,
                    adr: pc & !0b11,
                    resp: None,
                });
                FetchStatus::Pending
            }
        }
    }

    /// Returns `true` while an instruction-cache refill is in progress.
    pub const fn refill_active(&self) -> bool {
        self.icache.refill_active()
    }

    /// Invalidates the whole instruction cache (`fence.i`).
    pub fn invalidate_all(&mut self) {
        self.icache.invalidate_all();
    }

    /// Invalidates the line holding a word written on the data port.
    pub fn snoop(&mut self, addr: u32) {
        self.icache.invalidate(addr);
    }

    /// Beat driven on the instruction port this cycle.
    pub fn bus_request(&mut self) -> Option<BusRequest> {
        let pending_uncached = self.uncached.filter(|u| u.resp.is_none());
        let requests = [self.icache.refill_active(), pending_uncached.is_some()];
        match self.arbiter.arbitrate(&requests)? {
            SRC_REFILL => self.icache.refill_request(),
            _ => pending_uncached.map(|u| BusRequest::read(u.adr)),
        }
    }

    /// Delivers the instruction-port response for this cycle.
    pub fn bus_response(&mut self, resp: Option<BusResponse>) {
        let Some(resp) = resp else {
            return;
        };
        match self.arbiter.owner() {
            Some(SRC_REFILL) => {
                if self.icache.refill_response(resp).is_some() {
                    self.arbiter.release();
                }
            }
            Some(SRC_UNCACHED) => {
                if let Some(u) = self.uncached.as_mut() {
                    u.resp = Some(resp);
                }
                self.arbiter.release();
            }
            _ => {}
        }
    }
}
