//! Byte-lane formatting for loads and stores.
//!
//! The data port is a 32-bit little-endian Wishbone bus. Sub-word accesses select
//! lanes with `sel`, stores replicate their data onto every lane, and loads extract
//! and extend the addressed lanes.

use crate::common::error::Trap;
use crate::core::pipeline::signals::MemWidth;

/// Returns `true` if an access of `width` at `addr` is not naturally aligned.
pub const fn is_misaligned(addr: u32, width: MemWidth) -> bool {
    match width {
        MemWidth::Byte => false,
        MemWidth::Half => addr & 0b1 != 0,
        MemWidth::Word => addr & 0b11 != 0,
    }
}

/// Alignment exception for a load or store, if any.
pub const fn check_alignment(addr: u32, width: MemWidth, store: bool) -> Option<Trap> {
    if !is_misaligned(addr, width) {
        None
    } else if store {
        Some(Trap::StoreAddressMisaligned(addr))
    } else {
        Some(Trap::LoadAddressMisaligned(addr))
    }
}

/// Byte select for an aligned access.
///
/// # Examples
///
/// ```
/// use bellatrix_core::core::pipeline::signals::MemWidth;
/// use bellatrix_core::core::units::lsu::format::byte_select;
///
/// assert_eq!(byte_select(0x1003, MemWidth::Byte), 0b1000);
/// assert_eq!(byte_select(0x1002, MemWidth::Half), 0b1100);
/// assert_eq!(byte_select(0x1000, MemWidth::Word), 0b1111);
/// ```
pub const fn byte_select(addr: u32, width: MemWidth) -> u8 {
    match width {
        MemWidth::Byte => 1 << (addr & 0b11),
        MemWidth::Half => 0b11 << (addr & 0b10),
        MemWidth::Word => 0b1111,
    }
}

/// Replicates store data onto every byte lane it may occupy.
pub const fn store_data(value: u32, width: MemWidth) -> u32 {
    match width {
        MemWidth::Byte => (value & 0xff).wrapping_mul(0x0101_0101),
        MemWidth::Half => (value & 0xffff).wrapping_mul(0x0001_0001),
        MemWidth::Word => value,
    }
}

/// Extracts the addressed lanes of a bus word and extends them to 32 bits.
pub const fn load_extend(word: u32, addr: u32, width: MemWidth, signed: bool) -> u32 {
    let shifted = word >> ((addr & 0b11) * 8);
    match (width, signed) {
        (MemWidth::Byte, true) => shifted as u8 as i8 as i32 as u32,
        (MemWidth::Byte, false) => shifted & 0xff,
        (MemWidth::Half, true) => shifted as u16 as i16 as i32 as u32,
        (MemWidth::Half, false) => shifted & 0xffff,
        (MemWidth::Word, _) => word,
    }
}
