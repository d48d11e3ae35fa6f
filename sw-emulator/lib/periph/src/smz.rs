/*++

Licensed under the Apache-2.0 license.

File Name:

    smz.rs

Abstract:

    File contains the Secure Memory Zone: an encryption layer between the
    CPU and RAM that keeps a configurable address window encrypted at rest.

--*/

mod cipher;
mod config;
mod csr;
mod guard;
mod interceptor;
mod keystream;

pub use cipher::CipherPipeline;
pub use config::{ConfigError, ConfigRegisterFile, KeySlot, SecureRegionConfig};
pub use csr::{CsrError, CsrOp, SmzCsr};
pub use guard::AddressRangeGuard;
pub use interceptor::{BusInterceptor, InterceptError, MemoryAccessRequest, MemoryAccessResponse};
pub use keystream::{
    KeyManager, Keystream, KeystreamGenerator, KeystreamMode, UnknownKeystreamMode,
    ADDRESS_WHITENING,
};
