/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the SMZ Emulator Bus library.

--*/
mod bus;
mod mem;
mod ram;
pub mod testing;

pub use crate::bus::{Bus, BusError};
pub use crate::mem::MemError;
pub use crate::ram::Ram;
