/*++

Licensed under the Apache-2.0 license.

File Name:

    keystream.rs

Abstract:

    File contains keystream derivation for the Secure Memory Zone. Both
    modes are placeholders for a real cipher and offer no secrecy.

--*/

use super::config::SecureRegionConfig;
use smz_emu_types::{RvAddr, RvData};
use std::{fmt, str::FromStr};

/// Constant mixed into the address in address-derived mode
pub const ADDRESS_WHITENING: u32 = 0xDEAD_BEEF;

/// Value XORed with one bus word. Recomputed on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystream(u32);

impl Keystream {
    pub const fn new(val: u32) -> Self {
        Self(val)
    }

    pub const fn value(self) -> RvData {
        self.0
    }
}

/// Keystream derivation strategy, fixed when the interceptor is built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeystreamMode {
    /// `addr ^ 0xDEADBEEF`
    #[default]
    AddressDerived,

    /// `key0 ^ key1 ^ key2 ^ key3`, identical for every address in the region
    KeyRegisters,
}

impl fmt::Display for KeystreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeystreamMode::AddressDerived => "address",
            KeystreamMode::KeyRegisters => "keys",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keystream mode '{0}' (expected 'address' or 'keys')")]
pub struct UnknownKeystreamMode(pub String);

impl FromStr for KeystreamMode {
    type Err = UnknownKeystreamMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(KeystreamMode::AddressDerived),
            "keys" => Ok(KeystreamMode::KeyRegisters),
            other => Err(UnknownKeystreamMode(other.to_owned())),
        }
    }
}

/// Selects the seed material for an access.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyManager {
    mode: KeystreamMode,
}

impl KeyManager {
    pub fn new(mode: KeystreamMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> KeystreamMode {
        self.mode
    }

    /// Seed for an access to `addr`: the address itself, or the key words
    /// folded together.
    pub fn seed(&self, addr: RvAddr, cfg: &SecureRegionConfig) -> u32 {
        match self.mode {
            KeystreamMode::AddressDerived => addr,
            KeystreamMode::KeyRegisters => cfg.keys.iter().fold(0, |acc, key| acc ^ key),
        }
    }

    /// Keystream for one access, derived from `cfg` as it is now.
    pub fn keystream(&self, addr: RvAddr, cfg: &SecureRegionConfig) -> Keystream {
        KeystreamGenerator::generate(self.mode, self.seed(addr, cfg))
    }
}

/// Turns a seed into the keystream word.
pub struct KeystreamGenerator;

impl KeystreamGenerator {
    pub fn generate(mode: KeystreamMode, seed: u32) -> Keystream {
        match mode {
            KeystreamMode::AddressDerived => Keystream(seed ^ ADDRESS_WHITENING),
            KeystreamMode::KeyRegisters => Keystream(seed),
        }
    }
}
