/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the SMZ Emulator Types library.

--*/

mod byte_enable;
mod macros;

pub use crate::byte_enable::ByteEnable;

/// RISCV Data width
pub type RvData = u32;

/// RISCV Address width
pub type RvAddr = u32;

emu_enum!(
    /// RISCV IO Operation size
    #[derive(Debug, Eq, PartialEq, Copy, Clone)]
    pub RvSize;
    usize;
    {
        Byte = 1,
        HalfWord = 2,
        Word = 4,
    }
);

impl RvSize {
    /// Mask covering the low `self` bytes of a word.
    pub const fn data_mask(self) -> RvData {
        match self {
            RvSize::Byte => 0x0000_00FF,
            RvSize::HalfWord => 0x0000_FFFF,
            RvSize::Word => 0xFFFF_FFFF,
        }
    }

    /// Returns true if `addr` is a multiple of the access size.
    pub const fn is_aligned(self, addr: RvAddr) -> bool {
        addr & (self as RvAddr - 1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rv_size_conversions() {
        assert_eq!(usize::from(RvSize::HalfWord), 2);
        assert_eq!(RvSize::try_from(4usize), Ok(RvSize::Word));
        assert_eq!(RvSize::try_from(3usize), Err(3));
        assert_eq!(RvSize::Byte.to_string(), "Byte");
        assert_eq!(RvSize::ALL.len(), 3);
    }

    #[test]
    fn test_rv_size_alignment() {
        assert!(RvSize::Byte.is_aligned(0x1003));
        assert!(RvSize::HalfWord.is_aligned(0x1002));
        assert!(!RvSize::HalfWord.is_aligned(0x1001));
        assert!(RvSize::Word.is_aligned(0x1000));
        assert!(!RvSize::Word.is_aligned(0x1002));
        assert_eq!(RvSize::HalfWord.data_mask(), 0xFFFF);
    }
}
