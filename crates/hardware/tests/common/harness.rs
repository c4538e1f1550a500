//! Test harness.
//!
//! `TestContext` wires a core to a single RAM slave covering the 64 KiB window that
//! holds the reset address, loads programs through the RAM backdoor and runs them.

use bellatrix_core::config::Config;
use bellatrix_core::core::arch::csr::MTVEC;
use bellatrix_core::core::Cpu;
use bellatrix_core::core::arch::csr::Csrs;
use bellatrix_core::sim::Simulator;
use bellatrix_core::soc::{Interconnect, Ram};
use tracing_subscriber::EnvFilter;

use crate::common::builder::asm;

/// Address bits inside the RAM window (64 KiB).
pub const RAM_WIDTH: u32 = 16;
/// Base of the RAM window used by default (the default reset address).
pub const RAM_BASE: u32 = 0x8000_0000;
/// Scratch data area used by programs, well clear of the code.
pub const DATA_BASE: u32 = RAM_BASE + 0x8000;
/// Trap handler location used by the scenario tests.
pub const HANDLER: u32 = RAM_BASE + 0x100;
/// Cycle limit for the `run_until_*` helpers.
pub const MAX_CYCLES: u64 = 100_000;

/// Installs a `RUST_LOG`-filtered subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Packs instruction words into a little-endian byte image.
pub fn to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Points `mtvec` at [`HANDLER`] (clobbers `x10`).
pub const fn trap_vector_setup() -> [u32; 3] {
    let [hi, lo] = asm::li(10, HANDLER);
    [hi, lo, asm::csrw(MTVEC, 10)]
}

/// Concatenates program fragments.
pub fn program(parts: &[&[u32]]) -> Vec<u32> {
    parts.concat()
}

/// A simulator with RAM mapped around the reset address.
pub struct TestContext {
    /// The simulator under test.
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Default configuration, zero wait-state RAM.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Custom configuration, zero wait-state RAM.
    pub fn with_config(config: Config) -> Self {
        Self::with_wait_states(config, 0)
    }

    /// Custom configuration and RAM latency.
    pub fn with_wait_states(config: Config, wait_states: u32) -> Self {
        init_tracing();
        let base = config.core.reset_address & !((1 << RAM_WIDTH) - 1);
        let mut bus = Interconnect::new();
        bus.attach(
            base,
            RAM_WIDTH,
            Box::new(Ram::new("ram", 1 << RAM_WIDTH, wait_states)),
        );
        let sim = Simulator::new(&config, bus).expect("valid test configuration");
        Self { sim }
    }

    /// Loads `program` at the reset address.
    pub fn load_program(self, program: &[u32]) -> Self {
        let addr = self.sim.cpu.config.core.reset_address;
        self.load_at(addr, program)
    }

    /// Loads words at `addr`.
    pub fn load_at(mut self, addr: u32, words: &[u32]) -> Self {
        self.sim
            .load_image(addr, &to_bytes(words))
            .expect("image fits in test RAM");
        self
    }

    /// Loads a trap handler at [`HANDLER`].
    pub fn with_handler(self, handler: &[u32]) -> Self {
        self.load_at(HANDLER, handler)
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// CSR file.
    pub fn csrs(&self) -> &Csrs {
        &self.sim.cpu.trap_ctl.csrs
    }

    /// Read a general-purpose register value.
    pub fn reg(&self, r: usize) -> u32 {
        self.sim.cpu.regs.read(r)
    }

    /// All 32 registers.
    pub fn regs(&self) -> [u32; 32] {
        self.sim.cpu.regs.snapshot()
    }

    /// Runs for exactly `cycles` cycles.
    pub fn run(&mut self, cycles: u64) {
        self.sim.run(cycles);
    }

    /// Runs until `n` instructions have retired; returns the cycles taken.
    pub fn run_until_retired(&mut self, n: u64) -> u64 {
        self.sim
            .run_until(|cpu| cpu.stats.instructions_retired >= n, MAX_CYCLES)
            .unwrap_or_else(|| {
                panic!(
                    "only {} of {n} instructions retired\n{}",
                    self.sim.cpu.stats.instructions_retired,
                    self.sim.cpu.dump_state()
                )
            })
    }

    /// Runs until `n` traps have been taken; returns the cycles taken.
    pub fn run_until_traps(&mut self, n: u64) -> u64 {
        self.sim
            .run_until(|cpu| cpu.stats.traps_taken() >= n, MAX_CYCLES)
            .unwrap_or_else(|| panic!("trap {n} never taken\n{}", self.sim.cpu.dump_state()))
    }
}
