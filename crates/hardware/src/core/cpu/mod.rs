//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains registers, the fetch PC, and the trap controller
//!    (CSRs and privilege mode).
//! 2. **Pipeline Control:** Holds the stage registers of the six-stage pipeline.
//! 3. **Memory Hierarchy:** Owns the fetch unit (instruction cache) and the load/store
//!    unit (data cache and write buffer), the two Wishbone masters of the core.
//! 4. **Observability:** Accumulates performance counters.
//!
//! The bus and its slaves live outside the core; see [`crate::sim::Simulator`].

/// Per-cycle pipeline evaluation and redirects.
pub mod execution;

use tracing::debug;

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::arch::gpr::Gpr;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::TrapController;
use crate::core::pipeline::latches::{
    DecodeEntry, ExecuteEntry, FetchEntry, MemoryEntry, WritebackEntry,
};
use crate::core::units::bru::BranchPredictorWrapper;
use crate::core::units::fetch::FetchUnit;
use crate::core::units::lsu::LoadStoreUnit;
use crate::core::units::muldiv::MulDivUnit;
use crate::stats::SimStats;

/// How far back a redirect empties the pipeline.
///
/// Every level also replaces the fetch PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flush {
    /// From Writeback: empties Memory, Execute, Decode and Fetch-Data.
    Writeback,
    /// From Memory: empties Execute, Decode and Fetch-Data.
    Memory,
    /// From Execute: empties Decode and Fetch-Data.
    Execute,
}

/// Main CPU structure containing all processor state and components.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Integer register file.
    pub regs: Gpr,
    /// CSR file and privilege mode.
    pub trap_ctl: TrapController,
    /// Fetch PC (the Fetch-Address stage).
    pub pc: u32,
    /// Sequence number given to the next fetched instruction.
    pub next_seq: u64,

    /// Fetch-Data stage register.
    pub stage_f: Option<FetchEntry>,
    /// Decode stage register.
    pub stage_d: Option<DecodeEntry>,
    /// Execute stage register.
    pub stage_x: Option<ExecuteEntry>,
    /// Memory stage register.
    pub stage_m: Option<MemoryEntry>,
    /// Writeback stage register.
    pub stage_w: Option<WritebackEntry>,

    /// Branch predictor used by Fetch-Address.
    pub predictor: BranchPredictorWrapper,
    /// Instruction fetch engine.
    pub fetch: FetchUnit,
    /// Load/store unit.
    pub lsu: LoadStoreUnit,
    /// Multiplier and divider.
    pub muldiv: MulDivUnit,

    /// Performance counters kept by the pipeline.
    pub stats: SimStats,
    /// Configuration the core was built from.
    pub config: Config,
}

impl Cpu {
    /// Creates a core in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Core configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violation reported by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            regs: Gpr::new(),
            trap_ctl: TrapController::new(config),
            pc: config.core.reset_address,
            next_seq: 0,
            stage_f: None,
            stage_d: None,
            stage_x: None,
            stage_m: None,
            stage_w: None,
            predictor: BranchPredictorWrapper::new(&config.predictor),
            fetch: FetchUnit::new(&config.icache),
            lsu: LoadStoreUnit::new(&config.dcache),
            muldiv: MulDivUnit::default(),
            stats: SimStats::default(),
            config: config.clone(),
        })
    }

    /// Returns the core to its reset state, keeping the configuration.
    ///
    /// Caches, predictor state and counters are cleared as well.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        self.regs = Gpr::new();
        self.trap_ctl = TrapController::new(&config);
        self.pc = config.core.reset_address;
        self.next_seq = 0;
        self.stage_f = None;
        self.stage_d = None;
        self.stage_x = None;
        self.stage_m = None;
        self.stage_w = None;
        self.predictor = BranchPredictorWrapper::new(&config.predictor);
        self.fetch = FetchUnit::new(&config.icache);
        self.lsu = LoadStoreUnit::new(&config.dcache);
        self.muldiv = MulDivUnit::default();
        self.stats = SimStats::default();
        debug!(pc = format_args!("{:#010x}", self.pc), "reset");
    }

    /// Current privilege mode.
    pub const fn privilege(&self) -> PrivilegeMode {
        self.trap_ctl.privilege
    }

    /// Returns `true` when no instruction is in flight past Fetch-Address.
    pub const fn pipeline_empty(&self) -> bool {
        self.stage_f.is_none()
            && self.stage_d.is_none()
            && self.stage_x.is_none()
            && self.stage_m.is_none()
            && self.stage_w.is_none()
    }

    /// Counters, including those kept by the caches and the write buffer.
    pub fn stats(&self) -> SimStats {
        SimStats {
            icache_hits: self.fetch.icache.hits,
            icache_misses: self.fetch.icache.misses,
            dcache_hits: self.lsu.dcache.hits,
            dcache_misses: self.lsu.dcache.misses,
            write_errors: self.lsu.wbuf.errors,
            ..self.stats.clone()
        }
    }

    /// Formats the PC and register file for debugging.
    pub fn dump_state(&self) -> String {
        format!(
            "pc = {:#010x} ({})\n{}",
            self.pc,
            self.trap_ctl.privilege,
            self.regs.dump()
        )
    }
}
