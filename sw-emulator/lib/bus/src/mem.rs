/*++

Licensed under the Apache-2.0 license.

File Name:

    mem.rs

Abstract:

    File contains implementation of the byte store backing memory devices
    like RAM.

--*/

use crate::BusError;
use smz_emu_types::{ByteEnable, RvAddr, RvData, RvSize};

/// Memory Exception
#[derive(Debug, PartialEq, Eq)]
pub enum MemError {
    /// Read Address misaligned
    ReadAddrMisaligned,

    /// Read Access fault
    ReadAccessFault,

    /// Write Address misaligned
    WriteAddrMisaligned,

    /// Write access fault
    WriteAccessFault,
}

impl From<MemError> for BusError {
    /// Converts to this type from the input type.
    fn from(exception: MemError) -> BusError {
        match exception {
            MemError::ReadAddrMisaligned => BusError::LoadAddrMisaligned,
            MemError::ReadAccessFault => BusError::LoadAccessFault,
            MemError::WriteAddrMisaligned => BusError::StoreAddrMisaligned,
            MemError::WriteAccessFault => BusError::StoreAccessFault,
        }
    }
}

/// Little-endian byte store
pub(crate) struct Mem {
    /// Data storage
    data: Vec<u8>,
}

impl Mem {
    /// Create a new memory object
    ///
    /// # Arguments
    ///
    /// * `data` - Data contents for memory
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the memory in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Immutable reference to data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable reference to data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read data of specified size from given address. The address must be
    /// `size` aligned.
    ///
    /// # Error
    ///
    /// * `MemError::ReadAddrMisaligned` - Read address is not `size` aligned
    /// * `MemError::ReadAccessFault` - Read from invalid or non existent address
    #[inline]
    pub fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, MemError> {
        if !size.is_aligned(addr) {
            return Err(MemError::ReadAddrMisaligned);
        }
        let bytes = self
            .span(addr, size)
            .map(|range| &self.data[range])
            .ok_or(MemError::ReadAccessFault)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0, |word, &byte| (word << 8) | byte as RvData))
    }

    /// Write data of specified size to given address. The address must be
    /// `size` aligned.
    ///
    /// # Error
    ///
    /// * `MemError::WriteAddrMisaligned` - Write address is not `size` aligned
    /// * `MemError::WriteAccessFault` - Write to invalid or non existent address
    #[inline]
    pub fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), MemError> {
        if !size.is_aligned(addr) {
            return Err(MemError::WriteAddrMisaligned);
        }
        let range = self.span(addr, size).ok_or(MemError::WriteAccessFault)?;
        let bytes = val.to_le_bytes();
        self.data[range].copy_from_slice(&bytes[..usize::from(size)]);
        Ok(())
    }

    /// Write the lanes of `val` selected by `byte_enable` to the word at
    /// `addr`. Either every selected lane is written or, on error, none is.
    ///
    /// # Error
    ///
    /// * `MemError::WriteAddrMisaligned` - Write address is not word aligned
    /// * `MemError::WriteAccessFault` - Write to invalid or non existent address
    pub fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), MemError> {
        if !RvSize::Word.is_aligned(addr) {
            return Err(MemError::WriteAddrMisaligned);
        }
        let range = self
            .span(addr, RvSize::Word)
            .ok_or(MemError::WriteAccessFault)?;
        let bytes = val.to_le_bytes();
        let word = &mut self.data[range];
        for lane in byte_enable.lanes() {
            word[lane as usize] = bytes[lane as usize];
        }
        Ok(())
    }

    /// Byte range covered by an access, if it lies entirely inside memory.
    fn span(&self, addr: RvAddr, size: RvSize) -> Option<std::ops::Range<usize>> {
        let start = addr as usize;
        let end = start.checked_add(usize::from(size))?;
        (end <= self.data.len()).then_some(start..end)
    }
}
