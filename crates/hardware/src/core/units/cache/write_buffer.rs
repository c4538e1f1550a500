//! Write Buffer.
//!
//! A FIFO of committed cacheable stores waiting to be written to memory. It performs:
//! 1. **Buffering:** Stores complete in Memory as soon as they are queued.
//! 2. **Draining:** The oldest entry is written with a classic bus cycle whenever the
//!    data-port arbiter grants it (it has the highest priority there).
//! 3. **Forwarding:** A load that misses the data cache is answered from the buffer when
//!    the queued stores to its word cover every requested byte.

use std::collections::VecDeque;

use tracing::warn;

use super::lane_mask;
use crate::common::constants::WORD_ALIGN_MASK;
use crate::soc::wishbone::{BusRequest, BusResponse};

/// One queued store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteEntry {
    /// Word-aligned address.
    pub addr: u32,
    /// Data replicated onto the byte lanes.
    pub data: u32,
    /// Byte select.
    pub sel: u8,
}

/// Bounded FIFO of pending stores.
#[derive(Clone, Debug)]
pub struct WriteBuffer {
    entries: VecDeque<WriteEntry>,
    capacity: usize,
    /// Buffered writes terminated with a bus error.
    pub errors: u64,
}

impl WriteBuffer {
    /// Creates an empty buffer holding up to `capacity` stores.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            errors: 0,
        }
    }

    /// Number of queued stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no store is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if another store cannot be accepted.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Queues a store.
    ///
    /// # Returns
    ///
    /// `false` (and nothing is queued) if the buffer is full.
    pub fn push(&mut self, addr: u32, data: u32, sel: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push_back(WriteEntry {
            addr: addr & WORD_ALIGN_MASK,
            data,
            sel,
        });
        true
    }

    /// Classic write cycle for the oldest entry, if any.
    pub fn drain_request(&self) -> Option<BusRequest> {
        self.entries
            .front()
            .map(|e| BusRequest::write(e.addr, e.data, e.sel))
    }

    /// Consumes the bus response to the drain cycle.
    ///
    /// The entry leaves the buffer on `ack` or `err`. An error cannot be reported as a
    /// precise trap any more, so it is only logged and counted.
    ///
    /// # Returns
    ///
    /// The retired entry.
    pub fn drain_response(&mut self, resp: BusResponse) -> Option<WriteEntry> {
        if !(resp.ack || resp.err) {
            return None;
        }
        let entry = self.entries.pop_front()?;
        if resp.err {
            self.errors += 1;
            warn!(
                addr = format_args!("{:#010x}", entry.addr),
                data = format_args!("{:#010x}", entry.data),
                sel = entry.sel,
                "bus error on buffered write"
            );
        }
        Some(entry)
    }

    /// Assembles the word at `addr` from queued stores.
    ///
    /// Younger stores override older ones byte by byte.
    ///
    /// # Returns
    ///
    /// The merged word if the queued stores cover every lane in `sel`.
    pub fn forward(&self, addr: u32, sel: u8) -> Option<u32> {
        let word = addr & WORD_ALIGN_MASK;
        let mut covered = 0u8;
        let mut value = 0u32;
        for e in self.entries.iter().filter(|e| e.addr == word) {
            let mask = lane_mask(e.sel);
            value = (value & !mask) | (e.data & mask);
            covered |= e.sel;
        }
        (covered & sel == sel).then_some(value)
    }
}
