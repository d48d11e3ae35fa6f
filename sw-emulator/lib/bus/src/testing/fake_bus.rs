/*++

Licensed under the Apache-2.0 license.

File Name:

    fake_bus.rs

Abstract:

    File contains code for a fake implementation of the Bus trait.

--*/
use smz_emu_types::{ByteEnable, RvAddr, RvData, RvSize};

use crate::{testing::Log, Bus, BusError};
use std::collections::VecDeque;
use std::fmt::Write;

/// A Bus implementation that logs all calls, and allows the user to override
/// the return value of the methods.
///
/// Reads return the values queued in `read_values` first, then fall back to
/// `read_result`.
///
/// # Example
///
/// ```
/// use smz_emu_bus::{Bus, testing::FakeBus};
/// use smz_emu_types::{ByteEnable, RvSize};
///
/// let mut fake_bus = FakeBus::new();
/// fake_bus.read_result = Ok(35);
/// assert_eq!(fake_bus.read(RvSize::HalfWord, 0xdeadcafe), Ok(35));
/// fake_bus.write_strobed(0x10000, 0xff, ByteEnable::new(0b0001)).unwrap();
/// assert_eq!(
///     "read(RvSize::HalfWord, 0xdeadcafe)\nwrite_strobed(0x10000, 0xff, 0b0001)\n",
///     fake_bus.log.take()
/// );
/// ```
pub struct FakeBus {
    pub log: Log,
    pub read_values: VecDeque<RvData>,
    pub read_result: Result<RvData, BusError>,
    pub write_result: Result<(), BusError>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            log: Log::new(),
            read_values: VecDeque::new(),
            read_result: Ok(0),
            write_result: Ok(()),
        }
    }
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for FakeBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        writeln!(self.log.w(), "read(RvSize::{size:?}, {addr:#x})").unwrap();
        match self.read_values.pop_front() {
            Some(val) => Ok(val),
            None => self.read_result,
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        writeln!(self.log.w(), "write(RvSize::{size:?}, {addr:#x}, {val:#x})").unwrap();
        self.write_result
    }

    fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), BusError> {
        writeln!(self.log.w(), "write_strobed({addr:#x}, {val:#x}, {byte_enable})").unwrap();
        self.write_result
    }

    fn warm_reset(&mut self) {
        writeln!(self.log.w(), "warm_reset()").unwrap();
    }
}
