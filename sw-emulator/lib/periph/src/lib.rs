/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the SMZ Emulator Peripheral library.

--*/

mod smz;

pub use smz::{
    AddressRangeGuard, BusInterceptor, CipherPipeline, ConfigError, ConfigRegisterFile, CsrError,
    CsrOp, InterceptError, KeyManager, KeySlot, Keystream, KeystreamGenerator, KeystreamMode,
    MemoryAccessRequest, MemoryAccessResponse, SecureRegionConfig, SmzCsr, UnknownKeystreamMode,
    ADDRESS_WHITENING,
};
