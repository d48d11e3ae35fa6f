/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the SMZ driver library.

--*/

#![cfg_attr(not(test), no_std)]

mod error;
mod smz;

pub use error::DriverComponent;
pub use smz::{
    CsrAccess, EnableFlags, Smz, SmzConfig, SmzError, SmzResult, SETTLE_CYCLES, SMZ_CSR_BASE,
    SMZ_CSR_ENABLE, SMZ_CSR_KEY0, SMZ_CSR_SIZE,
};
