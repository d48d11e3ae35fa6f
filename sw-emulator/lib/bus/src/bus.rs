/*++

Licensed under the Apache-2.0 license.

File Name:

    bus.rs

Abstract:

    File contains definition of the Bus trait.

--*/

use smz_emu_types::{ByteEnable, RvAddr, RvData, RvSize};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BusError {
    /// Load address misaligned exception
    LoadAddrMisaligned,

    /// Load access fault exception
    LoadAccessFault,

    /// Store address misaligned exception
    StoreAddrMisaligned,

    /// Store access fault exception
    StoreAccessFault,
}

impl std::fmt::Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            BusError::LoadAddrMisaligned => "load address misaligned",
            BusError::LoadAccessFault => "load access fault",
            BusError::StoreAddrMisaligned => "store address misaligned",
            BusError::StoreAccessFault => "store access fault",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for BusError {}

/// Represents an abstract memory bus. Used to read and write from RAM and
/// peripheral addresses.
pub trait Bus {
    /// Read data of specified size from given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `addr` - Address to read from
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault` or `BusError::LoadAddrMisaligned`
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError>;

    /// Write data of specified size to given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the write
    /// * `addr` - Address to write
    /// * `val` - Data to write
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault` or `BusError::StoreAddrMisaligned`
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError>;

    /// Write the lanes of the word `val` selected by `byte_enable` to the
    /// word-aligned address `addr`. Lanes that are not selected keep their
    /// previous contents.
    ///
    /// The default implementation issues one word write for a full strobe and
    /// one byte write per lane otherwise.
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault` or `BusError::StoreAddrMisaligned`
    fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), BusError> {
        if !RvSize::Word.is_aligned(addr) {
            return Err(BusError::StoreAddrMisaligned);
        }
        if byte_enable.is_full() {
            return self.write(RvSize::Word, addr, val);
        }
        for lane in byte_enable.lanes() {
            self.write(RvSize::Byte, addr + lane, (val >> (8 * lane)) & 0xFF)?;
        }
        Ok(())
    }

    fn warm_reset(&mut self) {
        // By default, do nothing
    }
}

impl<T: Bus + ?Sized> Bus for Box<T> {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        (**self).read(size, addr)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        (**self).write(size, addr, val)
    }

    fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), BusError> {
        (**self).write_strobed(addr, val, byte_enable)
    }

    fn warm_reset(&mut self) {
        (**self).warm_reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    /// Bus that only implements the required methods, so the default
    /// `write_strobed` is exercised.
    struct LaneBus {
        inner: FakeBus,
    }

    impl Bus for LaneBus {
        fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
            self.inner.read(size, addr)
        }

        fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
            self.inner.write(size, addr, val)
        }
    }

    #[test]
    fn test_default_write_strobed_splits_lanes() {
        let mut bus = LaneBus {
            inner: FakeBus::new(),
        };
        bus.write_strobed(0x100, 0xAABB_CCDD, ByteEnable::new(0b1010))
            .unwrap();
        assert_eq!(
            "write(RvSize::Byte, 0x101, 0xcc)\nwrite(RvSize::Byte, 0x103, 0xaa)\n",
            bus.inner.log.take()
        );
    }

    #[test]
    fn test_default_write_strobed_full_word() {
        let mut bus = LaneBus {
            inner: FakeBus::new(),
        };
        bus.write_strobed(0x100, 0xAABB_CCDD, ByteEnable::ALL).unwrap();
        assert_eq!(
            "write(RvSize::Word, 0x100, 0xaabbccdd)\n",
            bus.inner.log.take()
        );
    }

    #[test]
    fn test_default_write_strobed_misaligned() {
        let mut bus = LaneBus {
            inner: FakeBus::new(),
        };
        assert_eq!(
            bus.write_strobed(0x102, 0, ByteEnable::ALL),
            Err(BusError::StoreAddrMisaligned)
        );
        assert_eq!("", bus.inner.log.take());
    }

    #[test]
    fn test_boxed_bus_delegates() {
        let mut bus: Box<dyn Bus> = Box::new(FakeBus::new());
        assert_eq!(bus.read(RvSize::Word, 0x40), Ok(0));
        assert_eq!(bus.write(RvSize::Word, 0x40, 1), Ok(()));
    }
}
