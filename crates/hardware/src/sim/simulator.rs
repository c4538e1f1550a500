//! Simulator: owns the core, the interconnect and the interrupt inputs side by side.
//!
//! The core only sees the bus through its two master ports, so the simulator keeps the
//! [`Interconnect`] outside the [`Cpu`] and lends it to every tick.

use tracing::info;

use crate::common::error::{ConfigError, LoadError};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::arch::trap::InterruptLines;
use crate::soc::Interconnect;
use crate::stats::SimStats;

/// Top-level simulator: core + interconnect + interrupt lines.
#[derive(Debug)]
pub struct Simulator {
    /// The core.
    pub cpu: Cpu,
    /// Bus with its slaves attached.
    pub bus: Interconnect,
    /// Interrupt line levels driven into the core every tick.
    pub irq: InterruptLines,
}

impl Simulator {
    /// Creates a simulator around an already populated interconnect.
    ///
    /// # Errors
    ///
    /// Returns the configuration violation reported by [`Cpu::new`].
    pub fn new(config: &Config, bus: Interconnect) -> Result<Self, ConfigError> {
        let cpu = Cpu::new(config)?;
        info!(
            reset = format_args!("{:#010x}", config.core.reset_address),
            rv32m = config.isa.enable_rv32m,
            user_mode = config.isa.enable_user_mode,
            extra_csr = config.isa.enable_extra_csr,
            predictor = config.predictor.enable.then_some(config.predictor.size),
            icache = config.icache.enable,
            dcache = config.dcache.enable,
            triggers = config.trigger.enable.then_some(config.trigger.ntriggers),
            "simulator created"
        );
        Ok(Self {
            cpu,
            bus,
            irq: InterruptLines::default(),
        })
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        self.cpu.tick(&mut self.bus, self.irq);
    }

    /// Runs for exactly `cycles` clock cycles.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.tick();
        }
    }

    /// Ticks until `done` holds or `max_cycles` have elapsed.
    ///
    /// `done` is checked before every tick.
    ///
    /// # Returns
    ///
    /// The number of cycles run, or `None` if the limit was reached first.
    pub fn run_until<F>(&mut self, mut done: F, max_cycles: u64) -> Option<u64>
    where
        F: FnMut(&Cpu) -> bool,
    {
        for cycle in 0..max_cycles {
            if done(&self.cpu) {
                return Some(cycle);
            }
            self.tick();
        }
        done(&self.cpu).then_some(max_cycles)
    }

    /// Writes a raw image into the slave mapped at `addr`.
    ///
    /// The write bypasses the bus and the caches; call it before the first tick or
    /// follow it with [`Cpu::reset`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unmapped`] if no slave decodes `addr`, or the slave's error
    /// if the image does not fit.
    pub fn load_image(&mut self, addr: u32, bytes: &[u8]) -> Result<(), LoadError> {
        let (slave, offset) = self.bus.slave_mut(addr).ok_or(LoadError::Unmapped(addr))?;
        slave.load(offset, bytes)?;
        info!(
            addr = format_args!("{addr:#010x}"),
            len = bytes.len(),
            slave = slave.name(),
            "image loaded"
        );
        Ok(())
    }

    /// Counters collected so far.
    pub fn stats(&self) -> SimStats {
        self.cpu.stats()
    }
}
