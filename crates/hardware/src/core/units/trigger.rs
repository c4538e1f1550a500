//! Hardware Triggers.
//!
//! Address/data match triggers (`mcontrol`, type 2) exposed through `tselect`, `tdata1`
//! and `tdata2`. A trigger compares `tdata2` against the PC of the instruction in Execute
//! or against the effective address of a load or store, and on a hit with action 0
//! raises a breakpoint exception on that instruction.
//!
//! Only the fields a match trigger needs are kept: `dmode`, `action`, `m`, `u`,
//! `execute`, `store` and `load`. There is no debug module, so hits whose action asks
//! for debug mode are ignored.

use crate::common::error::Trap;
use crate::core::arch::mode::PrivilegeMode;

/// `tdata1.type` value for an address/data match trigger.
pub const TYPE_MATCH: u32 = 2;

const TYPE_SHIFT: u32 = 28;
const DMODE_BIT: u32 = 1 << 27;
const ACTION_SHIFT: u32 = 12;
const ACTION_MASK: u32 = 0xF << ACTION_SHIFT;

/// `mcontrol.m`: match in Machine mode.
pub const MCONTROL_M: u32 = 1 << 6;
/// `mcontrol.u`: match in User mode.
pub const MCONTROL_U: u32 = 1 << 3;
/// `mcontrol.execute`: match the PC of executed instructions.
pub const MCONTROL_EXECUTE: u32 = 1 << 2;
/// `mcontrol.store`: match the address of stores.
pub const MCONTROL_STORE: u32 = 1 << 1;
/// `mcontrol.load`: match the address of loads.
pub const MCONTROL_LOAD: u32 = 1 << 0;

/// One trigger's state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Trigger {
    /// Writable `mcontrol` bits plus `dmode`.
    control: u32,
    /// Compare value.
    data: u32,
}

impl Trigger {
    const fn fires_in(&self, privilege: PrivilegeMode) -> bool {
        match privilege {
            PrivilegeMode::Machine => self.control & MCONTROL_M != 0,
            PrivilegeMode::User => self.control & MCONTROL_U != 0,
        }
    }

    const fn raises_exception(&self) -> bool {
        self.control & ACTION_MASK == 0
    }
}

/// Kind of access being matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Instruction execution (compare against the PC).
    Execute,
    /// Load (compare against the effective address).
    Load,
    /// Store (compare against the effective address).
    Store,
}

impl MatchKind {
    const fn enable_bit(self) -> u32 {
        match self {
            Self::Execute => MCONTROL_EXECUTE,
            Self::Load => MCONTROL_LOAD,
            Self::Store => MCONTROL_STORE,
        }
    }
}

/// Bank of match triggers selected through `tselect`.
#[derive(Clone, Debug)]
pub struct TriggerModule {
    triggers: Vec<Trigger>,
    select: usize,
    writable: u32,
}

impl TriggerModule {
    /// Creates `ntriggers` disarmed triggers.
    ///
    /// Without User mode the `u` bit is not writable.
    pub fn new(ntriggers: usize, enable_user_mode: bool) -> Self {
        let mut writable = DMODE_BIT
            | ACTION_MASK
            | MCONTROL_M
            | MCONTROL_EXECUTE
            | MCONTROL_STORE
            | MCONTROL_LOAD;
        if enable_user_mode {
            writable |= MCONTROL_U;
        }
        Self {
            triggers: vec![Trigger::default(); ntriggers],
            select: 0,
            writable,
        }
    }

    /// Number of triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Returns `true` if the bank has no triggers.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Value of `tselect`.
    pub const fn tselect(&self) -> u32 {
        self.select as u32
    }

    /// Writes `tselect`; indices at or beyond the trigger count are ignored.
    pub fn set_tselect(&mut self, val: u32) {
        let idx = val as usize;
        if idx < self.triggers.len() {
            self.select = idx;
        }
    }

    /// Value of `tdata1` for the selected trigger.
    pub fn tdata1(&self) -> u32 {
        self.triggers
            .get(self.select)
            .map_or(0, |t| (TYPE_MATCH << TYPE_SHIFT) | t.control)
    }

    /// Writes `tdata1` of the selected trigger, keeping only the implemented fields.
    pub fn set_tdata1(&mut self, val: u32) {
        let writable = self.writable;
        if let Some(t) = self.triggers.get_mut(self.select) {
            t.control = val & writable;
        }
    }

    /// Value of `tdata2` for the selected trigger.
    pub fn tdata2(&self) -> u32 {
        self.triggers.get(self.select).map_or(0, |t| t.data)
    }

    /// Writes `tdata2` of the selected trigger.
    pub fn set_tdata2(&mut self, val: u32) {
        if let Some(t) = self.triggers.get_mut(self.select) {
            t.data = val;
        }
    }

    /// Checks every trigger against one access.
    ///
    /// # Arguments
    ///
    /// * `kind` - What is being matched.
    /// * `value` - The PC (for [`MatchKind::Execute`]) or the effective address.
    /// * `privilege` - Current privilege mode.
    ///
    /// # Returns
    ///
    /// A breakpoint trap carrying `value` if an armed trigger with action 0 hits.
    pub fn check(&self, kind: MatchKind, value: u32, privilege: PrivilegeMode) -> Option<Trap> {
        let bit = kind.enable_bit();
        self.triggers
            .iter()
            .filter(|t| t.control & bit != 0 && t.data == value && t.fires_in(privilege))
            .any(Trigger::raises_exception)
            .then_some(Trap::Breakpoint(value))
    }
}
