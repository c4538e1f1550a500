//! Set-Associative Cache Engine.
//!
//! This module implements the storage and refill machinery shared by the instruction
//! and data caches. It provides:
//! 1. **Lookup:** Tag match across the ways of the indexed set with LRU update on a hit.
//! 2. **Store Update:** In-place byte-select writes to resident lines (write-through; the
//!    caller also sends the store to memory).
//! 3. **Refill:** A blocking critical-word-first burst that wraps around the line and
//!    validates it on the end-of-burst beat.
//! 4. **Invalidation:** Whole-cache (`fence.i`) and single-line (snoop) invalidation.
//!
//! Storage is a flat arena: `tags` holds one entry per `(set, way)` and `data` holds
//! `nwords` consecutive words per line, both indexed by `set * ways + way`.

/// Cache replacement policy implementations.
pub mod policies;

/// Store queue in front of the data port.
pub mod write_buffer;

use tracing::{debug, trace};

use self::policies::{LruPolicy, ReplacementPolicy};
use crate::common::constants::{WORD_ALIGN_MASK, WORD_BYTES};
use crate::config::CacheConfig;
use crate::soc::wishbone::{BurstType, BusRequest, BusResponse, CycleType, next_burst_address};

/// Tag store entry. Lines are never dirty in a write-through cache.
#[derive(Clone, Copy, Debug, Default)]
struct TagEntry {
    valid: bool,
    tag: u32,
}

/// An in-progress line fill.
#[derive(Clone, Copy, Debug)]
struct Refill {
    set: usize,
    way: usize,
    tag: u32,
    /// Address of the first byte of the line.
    line_addr: u32,
    /// Address of the beat currently presented on the bus.
    adr: u32,
    /// Beats still to be acknowledged, including the current one.
    remaining: usize,
    /// A snooped write hit the line while it was filling.
    stale: bool,
}

/// Outcome of a completed refill, reported back to the requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefillEvent {
    /// The line is now valid.
    Filled(u32),
    /// The burst terminated with `err`; the line stays invalid.
    Failed(u32),
}

/// Set-associative cache with LRU replacement and burst refill.
#[derive(Clone, Debug)]
pub struct Cache {
    name: &'static str,
    enable: bool,
    start_addr: u32,
    end_addr: u32,
    sets: usize,
    ways: usize,
    nwords: usize,
    word_bits: u32,
    index_bits: u32,
    tags: Vec<TagEntry>,
    data: Vec<u32>,
    policy: LruPolicy,
    refill: Option<Refill>,
    failed_line: Option<u32>,
    /// Lookups that found the word resident.
    pub hits: u64,
    /// Refills started.
    pub misses: u64,
}

impl Cache {
    /// Creates an empty (all lines invalid) cache.
    ///
    /// # Arguments
    ///
    /// * `name` - Instance name used in logs (`"icache"`, `"dcache"`).
    /// * `config` - Validated geometry and cacheable window.
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let sets = config.nlines.max(1);
        let ways = config.nways.max(1);
        let nwords = config.nwords.max(1);
        Self {
            name,
            enable: config.enable,
            start_addr: config.start_addr,
            end_addr: config.end_addr,
            sets,
            ways,
            nwords,
            word_bits: nwords.trailing_zeros(),
            index_bits: sets.trailing_zeros(),
            tags: vec![TagEntry::default(); sets * ways],
            data: vec![0; sets * ways * nwords],
            policy: LruPolicy::new(sets, ways),
            refill: None,
            failed_line: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns `true` if accesses to `addr` go through this cache.
    pub const fn is_cacheable(&self, addr: u32) -> bool {
        self.enable && self.start_addr <= addr && addr <= self.end_addr
    }

    const fn word_of(&self, addr: u32) -> usize {
        ((addr >> 2) as usize) & (self.nwords - 1)
    }

    const fn set_of(&self, addr: u32) -> usize {
        ((addr >> (2 + self.word_bits)) as usize) & (self.sets - 1)
    }

    const fn tag_of(&self, addr: u32) -> u32 {
        let shift = 2 + self.word_bits + self.index_bits;
        if shift >= 32 { 0 } else { addr >> shift }
    }

    const fn line_addr(&self, addr: u32) -> u32 {
        addr & !((self.nwords as u32 * WORD_BYTES) - 1)
    }

    const fn slot(&self, set: usize, way: usize) -> usize {
        set * self.ways + way
    }

    fn find_way(&self, addr: u32) -> Option<usize> {
        let set = self.set_of(addr);
        let tag = self.tag_of(addr);
        (0..self.ways).find(|&way| {
            self.tags
                .get(self.slot(set, way))
                .is_some_and(|t| t.valid && t.tag == tag)
        })
    }

    /// Reads the word containing `addr` if its line is resident.
    ///
    /// A hit refreshes the line's LRU position.
    pub fn lookup(&mut self, addr: u32) -> Option<u32> {
        let way = self.find_way(addr)?;
        let set = self.set_of(addr);
        self.policy.update(set, way);
        self.hits += 1;
        let idx = self.slot(set, way) * self.nwords + self.word_of(addr);
        self.data.get(idx).copied()
    }

    /// Returns `true` if the line holding `addr` is resident, without touching LRU state.
    pub fn contains(&self, addr: u32) -> bool {
        self.find_way(addr).is_some()
    }

    /// Merges a store into the resident line, if any.
    ///
    /// # Arguments
    ///
    /// * `addr` - Store address.
    /// * `data` - Store data, already replicated onto the byte lanes.
    /// * `sel` - Byte select.
    ///
    /// # Returns
    ///
    /// `true` on a hit. Misses do not allocate.
    pub fn write_hit(&mut self, addr: u32, data: u32, sel: u8) -> bool {
        let Some(way) = self.find_way(addr) else {
            return false;
        };
        let set = self.set_of(addr);
        self.policy.update(set, way);
        let idx = self.slot(set, way) * self.nwords + self.word_of(addr);
        if let Some(word) = self.data.get_mut(idx) {
            let mask = lane_mask(sel);
            *word = (*word & !mask) | (data & mask);
        }
        true
    }

    /// Returns `true` while a line fill is in progress.
    pub const fn refill_active(&self) -> bool {
        self.refill.is_some()
    }

    /// Starts filling the line that holds `addr`.
    ///
    /// The victim is an invalid way of the set if there is one, otherwise the LRU way.
    /// It is invalidated immediately. The first beat requests the word at `addr`.
    pub fn start_refill(&mut self, addr: u32) {
        if self.refill.is_some() {
            return;
        }
        let set = self.set_of(addr);
        let way = (0..self.ways)
            .find(|&w| self.tags.get(self.slot(set, w)).is_some_and(|t| !t.valid))
            .unwrap_or_else(|| self.policy.get_victim(set));
        let slot = self.slot(set, way);
        if let Some(t) = self.tags.get_mut(slot) {
            t.valid = false;
        }
        self.misses += 1;
        self.failed_line = None;
        let line_addr = self.line_addr(addr);
        debug!(
            cache = self.name,
            addr = format_args!("{addr:#010x}"),
            line = format_args!("{line_addr:#010x}"),
            set,
            way,
            "refill start"
        );
        self.refill = Some(Refill {
            set,
            way,
            tag: self.tag_of(addr),
            line_addr,
            adr: addr & WORD_ALIGN_MASK,
            remaining: self.nwords,
            stale: false,
        });
    }

    /// Beat the refill engine presents on the bus this cycle, if a fill is active.
    pub fn refill_request(&self) -> Option<BusRequest> {
        let r = self.refill.as_ref()?;
        let cti = if r.remaining <= 1 {
            CycleType::End
        } else {
            CycleType::Increment
        };
        Some(BusRequest {
            cti,
            bte: BurstType::wrap_for(self.nwords),
            ..BusRequest::read(r.adr)
        })
    }

    /// Consumes the bus response to the current refill beat.
    ///
    /// # Returns
    ///
    /// A [`RefillEvent`] when the fill finishes (successfully or not).
    pub fn refill_response(&mut self, resp: BusResponse) -> Option<RefillEvent> {
        let mut r = self.refill?;
        let base = self.slot(r.set, r.way) * self.nwords;
        if resp.err {
            self.refill = None;
            self.failed_line = Some(r.line_addr);
            debug!(
                cache = self.name,
                line = format_args!("{:#010x}", r.line_addr),
                "refill bus error"
            );
            return Some(RefillEvent::Failed(r.line_addr));
        }
        if !resp.ack {
            return None;
        }
        let idx = base + self.word_of(r.adr);
        if let Some(word) = self.data.get_mut(idx) {
            *word = resp.dat_r;
        }
        trace!(
            cache = self.name,
            adr = format_args!("{:#010x}", r.adr),
            remaining = r.remaining,
            "refill beat"
        );
        r.remaining -= 1;
        if r.remaining > 0 {
            let bte = BurstType::wrap_for(self.nwords);
            r.adr = next_burst_address(r.adr, CycleType::Increment, bte);
            self.refill = Some(r);
            return None;
        }

        self.refill = None;
        let slot = self.slot(r.set, r.way);
        if !r.stale {
            if let Some(t) = self.tags.get_mut(slot) {
                *t = TagEntry {
                    valid: true,
                    tag: r.tag,
                };
            }
            self.policy.update(r.set, r.way);
        }
        debug!(
            cache = self.name,
            line = format_args!("{:#010x}", r.line_addr),
            stale = r.stale,
            "refill done"
        );
        Some(RefillEvent::Filled(r.line_addr))
    }

    /// Reports and clears a failed refill of the line holding `addr`.
    pub fn take_refill_error(&mut self, addr: u32) -> bool {
        if self.failed_line == Some(self.line_addr(addr)) {
            self.failed_line = None;
            true
        } else {
            false
        }
    }

    /// Invalidates the line holding `addr`, including a fill of that line in progress.
    pub fn invalidate(&mut self, addr: u32) {
        let line_addr = self.line_addr(addr);
        if let Some(r) = self.refill.as_mut().filter(|r| r.line_addr == line_addr) {
            r.stale = true;
        }
        if let Some(way) = self.find_way(addr) {
            let slot = self.slot(self.set_of(addr), way);
            if let Some(t) = self.tags.get_mut(slot) {
                t.valid = false;
            }
            trace!(
                cache = self.name,
                line = format_args!("{line_addr:#010x}"),
                "line invalidated"
            );
        }
    }

    /// Invalidates every line.
    pub fn invalidate_all(&mut self) {
        for t in &mut self.tags {
            t.valid = false;
        }
        debug!(cache = self.name, "cache invalidated");
    }
}

/// Expands a byte select into a 32-bit lane mask.
pub const fn lane_mask(sel: u8) -> u32 {
    let mut mask = 0;
    let mut lane = 0;
    while lane < 4 {
        if sel & (1 << lane) != 0 {
            mask |= 0xff << (lane * 8);
        }
        lane += 1;
    }
    mask
}
