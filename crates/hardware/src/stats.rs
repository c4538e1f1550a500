//! Simulation statistics collection and reporting.
//!
//! This module tracks performance counters for the core. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived IPC/CPI.
//! 2. **Stalls:** Cycles lost per cause (data hazard, multi-cycle unit, fetch, memory).
//! 3. **Branch prediction:** Resolved branches/jumps and redirects from Execute.
//! 4. **Traps:** Exceptions and interrupts taken.
//! 5. **Caches:** Hit/miss counts for the instruction and data caches.
//!
//! Counters are plain fields updated by the pipeline; reporting goes through `tracing`
//! or JSON, never stdout.

use serde::Serialize;
use tracing::info;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Decode stall cycles waiting for an operand or a CSR commit.
    pub stalls_data: u64,
    /// Execute stall cycles waiting for the multiplier or divider.
    pub stalls_muldiv: u64,
    /// Cycles the Fetch-Data stage waited for an instruction word.
    pub stalls_fetch: u64,
    /// Cycles the Memory stage waited for a load, store or `fence.i`.
    pub stalls_mem: u64,

    /// Branches and jumps resolved in Execute.
    pub branches: u64,
    /// Redirects from Execute (wrong direction, wrong target, or aliasing).
    pub mispredictions: u64,

    /// Exceptions taken.
    pub exceptions: u64,
    /// Interrupts taken.
    pub interrupts: u64,

    /// Instruction cache hits.
    pub icache_hits: u64,
    /// Instruction cache misses (refills started).
    pub icache_misses: u64,
    /// Data cache hits.
    pub dcache_hits: u64,
    /// Data cache misses (refills started).
    pub dcache_misses: u64,
    /// Buffered stores that ended with a bus error.
    pub write_errors: u64,
}

/// Ratio with a zero denominator mapped to zero.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl SimStats {
    /// Instructions per cycle.
    pub fn ipc(&self) -> f64 {
        ratio(self.instructions_retired, self.cycles)
    }

    /// Cycles per instruction.
    pub fn cpi(&self) -> f64 {
        ratio(self.cycles, self.instructions_retired)
    }

    /// Fraction of resolved branches and jumps that redirected fetch.
    pub fn misprediction_rate(&self) -> f64 {
        ratio(self.mispredictions, self.branches)
    }

    /// Instruction cache hit rate.
    pub fn icache_hit_rate(&self) -> f64 {
        ratio(self.icache_hits, self.icache_hits + self.icache_misses)
    }

    /// Data cache hit rate.
    pub fn dcache_hit_rate(&self) -> f64 {
        ratio(self.dcache_hits, self.dcache_hits + self.dcache_misses)
    }

    /// Total trap count.
    pub const fn traps_taken(&self) -> u64 {
        self.exceptions + self.interrupts
    }

    /// Serializes the counters as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization errors.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Logs a summary at `info` level.
    pub fn log_summary(&self) {
        info!(
            cycles = self.cycles,
            retired = self.instructions_retired,
            ipc = format_args!("{:.4}", self.ipc()),
            cpi = format_args!("{:.4}", self.cpi()),
            "core summary"
        );
        info!(
            data = self.stalls_data,
            muldiv = self.stalls_muldiv,
            fetch = self.stalls_fetch,
            mem = self.stalls_mem,
            "stall cycles"
        );
        info!(
            branches = self.branches,
            mispredictions = self.mispredictions,
            rate = format_args!("{:.2}%", self.misprediction_rate() * 100.0),
            exceptions = self.exceptions,
            interrupts = self.interrupts,
            "control flow"
        );
        info!(
            icache_hits = self.icache_hits,
            icache_misses = self.icache_misses,
            dcache_hits = self.dcache_hits,
            dcache_misses = self.dcache_misses,
            write_errors = self.write_errors,
            "caches"
        );
    }
}
