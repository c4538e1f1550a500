//! Wishbone B4 bus signals.
//!
//! This module defines the signal bundles exchanged between masters and slaves. It provides:
//! 1. **Request:** Address, write data, byte select, write enable, and the registered
//!    feedback tags `cti` (cycle type) and `bte` (burst type extension).
//! 2. **Response:** Read data with the `ack`/`err` terminators.
//! 3. **Burst Addressing:** The next-beat address rule for incrementing and wrapping bursts.
//!
//! `cyc` and `stb` are implied: a master asserts them exactly when it presents a
//! [`BusRequest`] in a given cycle.

use crate::common::constants::{SEL_WORD, WORD_BYTES};

/// Cycle type identifier (`cti`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleType {
    /// Single classic transfer.
    #[default]
    Classic = 0b000,
    /// Constant-address burst.
    Constant = 0b001,
    /// Incrementing burst.
    Increment = 0b010,
    /// Last beat of a burst.
    End = 0b111,
}

impl CycleType {
    /// Returns `true` if a beat of this type is the last one of its bus cycle.
    pub const fn ends_cycle(self) -> bool {
        matches!(self, Self::Classic | Self::End)
    }
}

/// Burst type extension (`bte`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BurstType {
    /// Linear incrementing burst.
    #[default]
    Linear = 0b00,
    /// Wrap at a 4-word boundary.
    Wrap4 = 0b01,
    /// Wrap at an 8-word boundary.
    Wrap8 = 0b10,
    /// Wrap at a 16-word boundary.
    Wrap16 = 0b11,
}

impl BurstType {
    /// Returns the wrapping burst for a line of `nwords` words.
    ///
    /// Line sizes without a wrap mode fall back to [`BurstType::Linear`].
    pub const fn wrap_for(nwords: usize) -> Self {
        match nwords {
            4 => Self::Wrap4,
            8 => Self::Wrap8,
            16 => Self::Wrap16,
            _ => Self::Linear,
        }
    }

    /// Byte-address mask of the wrap window, or `None` for linear bursts.
    const fn wrap_mask(self) -> Option<u32> {
        match self {
            Self::Linear => None,
            Self::Wrap4 => Some(4 * WORD_BYTES - 1),
            Self::Wrap8 => Some(8 * WORD_BYTES - 1),
            Self::Wrap16 => Some(16 * WORD_BYTES - 1),
        }
    }
}

/// Computes the address of the beat following `adr`.
///
/// Classic cycles and constant bursts keep the address. Incrementing bursts advance by
/// one word; wrapping variants keep the upper bits and increment within the wrap window.
///
/// # Examples
///
/// ```
/// use bellatrix_core::soc::wishbone::{BurstType, CycleType, next_burst_address};
///
/// assert_eq!(next_burst_address(0x100, CycleType::Increment, BurstType::Linear), 0x104);
/// assert_eq!(next_burst_address(0x10c, CycleType::Increment, BurstType::Wrap4), 0x100);
/// assert_eq!(next_burst_address(0x11c, CycleType::Increment, BurstType::Wrap8), 0x100);
/// assert_eq!(next_burst_address(0x108, CycleType::Constant, BurstType::Wrap4), 0x108);
/// ```
pub const fn next_burst_address(adr: u32, cti: CycleType, bte: BurstType) -> u32 {
    match cti {
        CycleType::Increment => match bte.wrap_mask() {
            None => adr.wrapping_add(WORD_BYTES),
            Some(mask) => (adr & !mask) | (adr.wrapping_add(WORD_BYTES) & mask),
        },
        _ => adr,
    }
}

/// Master-to-slave signals of one beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusRequest {
    /// Byte address (word aligned).
    pub adr: u32,
    /// Write data.
    pub dat_w: u32,
    /// Byte select (one bit per byte lane).
    pub sel: u8,
    /// Write enable.
    pub we: bool,
    /// Cycle type.
    pub cti: CycleType,
    /// Burst type extension.
    pub bte: BurstType,
}

impl BusRequest {
    /// Classic single-word read.
    pub const fn read(adr: u32) -> Self {
        Self {
            adr,
            dat_w: 0,
            sel: SEL_WORD,
            we: false,
            cti: CycleType::Classic,
            bte: BurstType::Linear,
        }
    }

    /// Classic write of the byte lanes in `sel`.
    pub const fn write(adr: u32, dat_w: u32, sel: u8) -> Self {
        Self {
            adr,
            dat_w,
            sel,
            we: true,
            cti: CycleType::Classic,
            bte: BurstType::Linear,
        }
    }

    /// Returns `true` if this is the final beat of its bus cycle.
    pub const fn is_last(&self) -> bool {
        self.cti.ends_cycle()
    }
}

/// Slave-to-master signals terminating one beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusResponse {
    /// Read data (meaningful on `ack` of a read).
    pub dat_r: u32,
    /// Normal termination.
    pub ack: bool,
    /// Error termination.
    pub err: bool,
}

impl BusResponse {
    /// Acknowledge carrying `dat_r`.
    pub const fn ack(dat_r: u32) -> Self {
        Self {
            dat_r,
            ack: true,
            err: false,
        }
    }

    /// Error termination.
    pub const fn error() -> Self {
        Self {
            dat_r: 0,
            ack: false,
            err: true,
        }
    }
}
