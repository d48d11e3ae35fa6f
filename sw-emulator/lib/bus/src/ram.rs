/*++

Licensed under the Apache-2.0 license.

File Name:

    ram.rs

Abstract:

    File contains implementation of RAM

--*/

use crate::{mem::Mem, Bus, BusError};
use smz_emu_types::{ByteEnable, RvAddr, RvData, RvSize};

/// Read Write Memory Device
pub struct Ram {
    /// Backing store
    data: Mem,
}

impl Ram {
    /// Create new RAM
    ///
    /// # Arguments
    ///
    /// * `data` - Initial contents of the RAM
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Mem::new(data),
        }
    }

    /// Create a zero-filled RAM of `len` bytes
    pub fn with_size(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    pub fn mmap_size(&self) -> RvAddr {
        self.data.len() as RvAddr
    }

    /// Raw contents, as an observer probing the memory chips would see them
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Mutable raw contents, bypassing the bus
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.data_mut()
    }
}

impl Bus for Ram {
    /// Read data of specified size from given address
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the read
    /// * `addr` - Address to read from
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault`
    ///                or `BusError::LoadAddrMisaligned`
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        Ok(self.data.read(size, addr)?)
    }

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
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault`
    ///                or `BusError::StoreAddrMisaligned`
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        Ok(self.data.write(size, addr, val)?)
    }

    fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), BusError> {
        Ok(self.data.write_strobed(addr, val, byte_enable)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let ram = Ram::with_size(16);
        assert_eq!(ram.mmap_size(), 16);
        assert_eq!(ram.data(), &[0u8; 16]);
    }

    #[test]
    fn test_read() {
        let mut ram = Ram::new(vec![1, 2, 3, 4]);
        assert_eq!(ram.read(RvSize::Byte, 0).ok(), Some(1));
        assert_eq!(ram.read(RvSize::HalfWord, 0).ok(), Some(1 | 2 << 8));
        assert_eq!(
            ram.read(RvSize::Word, 0).ok(),
            Some(1 | 2 << 8 | 3 << 16 | 4 << 24)
        );
    }

    #[test]
    fn test_read_error() {
        let mut ram = Ram::new(vec![1, 2, 3, 4]);
        let end = ram.mmap_size();
        assert_eq!(
            ram.read(RvSize::Byte, end).err(),
            Some(BusError::LoadAccessFault)
        );
    }

    #[test]
    fn test_write() {
        let mut ram = Ram::new(vec![1, 2, 3, 4]);
        assert_eq!(ram.write(RvSize::Byte, 0, u32::MAX).ok(), Some(()));
        assert_eq!(ram.data(), &[0xFF, 2, 3, 4]);
    }

    #[test]
    fn test_write_error() {
        let mut ram = Ram::new(vec![1, 2, 3, 4]);
        let end = ram.mmap_size();
        assert_eq!(
            ram.write(RvSize::Byte, end, 0).err(),
            Some(BusError::StoreAccessFault)
        );
    }

    #[test]
    fn test_write_strobed() {
        let mut ram = Ram::with_size(8);
        assert_eq!(
            ram.write_strobed(4, 0x4433_2211, ByteEnable::new(0b1001)),
            Ok(())
        );
        assert_eq!(ram.data(), &[0, 0, 0, 0, 0x11, 0, 0, 0x44]);
        assert_eq!(
            ram.write_strobed(8, 0, ByteEnable::ALL),
            Err(BusError::StoreAccessFault)
        );
    }
}
