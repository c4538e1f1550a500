//! Main Execution Loop.
//!
//! This module implements the clock cycle of the core. Each tick performs the following:
//! 1. **Interrupt Sampling:** Latches the interrupt lines into `mip` and counts the cycle.
//! 2. **Pipeline Evaluation:** Runs the stages from Writeback back to Fetch-Address, so
//!    entries advance into stage registers vacated earlier in the same tick. A redirect
//!    from Writeback ends the stage evaluation for the cycle.
//! 3. **Bus Service:** Drives one beat per master port through the interconnect and
//!    delivers the responses to the fetch unit and the load/store unit.

use tracing::trace;

use super::{Cpu, Flush};
use crate::core::arch::trap::InterruptLines;
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_address_stage, fetch_stage, mem_stage, wb_stage,
};
use crate::soc::Interconnect;
use crate::soc::interconnect::{NUM_PORTS, Port};

impl Cpu {
    /// Advances the core by one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `bus` - Interconnect the two master ports are attached to.
    /// * `irq` - Interrupt line levels for this cycle.
    pub fn tick(&mut self, bus: &mut Interconnect, irq: InterruptLines) {
        self.trap_ctl.sample_interrupts(irq);
        self.trap_ctl.csrs.mcycle = self.trap_ctl.csrs.mcycle.wrapping_add(1);
        self.stats.cycles += 1;

        // A redirecting stage has already emptied every younger stage.
        if !wb_stage(self) && !mem_stage(self, bus) && !execute_stage(self) {
            decode_stage(self);
            fetch_stage(self);
        }
        fetch_address_stage(self);

        self.service_bus(bus);
    }

    /// Replaces the fetch PC and empties the stages younger than the redirecting one.
    pub fn redirect(&mut self, target: u32, flush: Flush) {
        trace!(target = format_args!("{target:#010x}"), ?flush, "redirect");
        match flush {
            Flush::Writeback => {
                self.stage_m = None;
                self.stage_x = None;
            }
            Flush::Memory => self.stage_x = None,
            Flush::Execute => {}
        }
        self.stage_d = None;
        self.stage_f = None;
        self.pc = target;
    }

    fn service_bus(&mut self, bus: &mut Interconnect) {
        let mut requests = [None; NUM_PORTS];
        requests[Port::Data as usize] = self.lsu.bus_request();
        requests[Port::Instruction as usize] = self.fetch.bus_request();
        let responses = bus.tick(requests);
        if let Some(addr) = self.lsu.bus_response(responses[Port::Data as usize]) {
            self.fetch.snoop(addr);
        }
        self.fetch.bus_response(responses[Port::Instruction as usize]);
    }
}
