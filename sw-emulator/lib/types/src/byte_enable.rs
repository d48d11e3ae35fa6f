/*++

Licensed under the Apache-2.0 license.

File Name:

    byte_enable.rs

Abstract:

    File contains the byte-lane strobe that accompanies a word on the memory
    bus.

--*/

use crate::{RvAddr, RvData, RvSize};

/// Byte-lane write strobe for one 32-bit bus word.
///
/// Bit `i` selects bits `8*i..8*i+8` of the word. Only the low four bits are
/// meaningful; anything above is dropped on construction.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ByteEnable(u8);

impl ByteEnable {
    /// No lanes selected
    pub const NONE: ByteEnable = ByteEnable(0b0000);

    /// Every lane of the word selected
    pub const ALL: ByteEnable = ByteEnable(0b1111);

    /// Number of lanes in a bus word
    pub const LANES: u32 = 4;

    pub const fn new(mask: u8) -> Self {
        Self(mask & 0b1111)
    }

    /// Strobe for a CPU access of `size` at byte address `addr`.
    ///
    /// The lanes are positioned by the low address bits; the caller is
    /// responsible for rejecting misaligned accesses first.
    pub const fn for_access(size: RvSize, addr: RvAddr) -> Self {
        let lane = addr & 0b11;
        match size {
            RvSize::Byte => Self::new(0b0001 << lane),
            RvSize::HalfWord => Self::new(0b0011 << lane),
            RvSize::Word => Self::ALL,
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_full(self) -> bool {
        self.0 == Self::ALL.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn lane_enabled(self, lane: u32) -> bool {
        lane < Self::LANES && self.0 & (1 << lane) != 0
    }

    /// Iterate over the enabled lane indices, lowest first.
    pub fn lanes(self) -> impl Iterator<Item = u32> {
        (0..Self::LANES).filter(move |&lane| self.lane_enabled(lane))
    }

    /// Expand the strobe into a data mask, 0xFF per enabled lane.
    pub fn data_mask(self) -> RvData {
        self.lanes().fold(0, |mask, lane| mask | (0xFF << (8 * lane)))
    }
}

impl From<u8> for ByteEnable {
    fn from(mask: u8) -> Self {
        Self::new(mask)
    }
}

impl From<ByteEnable> for u8 {
    fn from(strobe: ByteEnable) -> u8 {
        strobe.0
    }
}

impl core::fmt::Display for ByteEnable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:#06b}", self.0)
    }
}
