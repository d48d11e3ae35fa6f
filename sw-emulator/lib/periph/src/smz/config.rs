/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the secure region descriptor and the register file that
    owns and validates it.

--*/

use smz_emu_types::{emu_enum, RvAddr};
use std::fmt;

/// Rejected configuration register update
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Base address is not word aligned
    #[error("secure region base {0:#010x} is not word aligned")]
    InvalidAlignment(RvAddr),

    /// Size is zero or not a power of two
    #[error("secure region size {0:#x} is not a nonzero power of two")]
    InvalidSize(u32),
}

emu_enum!(
    /// Key register index
    #[derive(Debug, Eq, PartialEq, Copy, Clone)]
    pub KeySlot;
    usize;
    {
        Key0 = 0,
        Key1 = 1,
        Key2 = 2,
        Key3 = 3,
    }
);

/// Secure region descriptor.
///
/// Membership is the half-open interval `[base, base + size)` and only
/// applies while `enabled` is set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SecureRegionConfig {
    /// Lower bound of the region, word aligned
    pub base: RvAddr,

    /// Region length in bytes, a nonzero power of two once configured
    pub size: u32,

    /// Interception gate
    pub enabled: bool,

    /// Key words for the key-register keystream
    pub keys: [u32; 4],
}

impl fmt::Display for SecureRegionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:#010x}, +{:#x}) {}",
            self.base,
            self.size,
            if self.enabled { "enabled" } else { "disabled" }
        )
    }
}

/// Register file holding the secure region configuration.
///
/// Every setter validates its argument and leaves the register untouched when
/// the value is rejected. Reconfiguring an enabled region is allowed; callers
/// that change base and size together are expected to disable the region
/// first.
#[derive(Debug, Default)]
pub struct ConfigRegisterFile {
    config: SecureRegionConfig,
}

impl ConfigRegisterFile {
    /// Create a register file holding the reset configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the reset configuration: disabled, zero base, size and keys.
    pub fn reset(&mut self) {
        self.config = SecureRegionConfig::default();
        log::info!("smz: configuration reset");
    }

    /// Consistent copy of the whole configuration
    pub fn snapshot(&self) -> SecureRegionConfig {
        self.config
    }

    pub fn base(&self) -> RvAddr {
        self.config.base
    }

    pub fn size(&self) -> u32 {
        self.config.size
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn key(&self, slot: KeySlot) -> u32 {
        self.config.keys[usize::from(slot)]
    }

    pub fn keys(&self) -> [u32; 4] {
        self.config.keys
    }

    /// Set the region base address
    ///
    /// # Error
    ///
    /// * `ConfigError::InvalidAlignment` - `base` is not a multiple of 4
    pub fn set_base(&mut self, base: RvAddr) -> Result<(), ConfigError> {
        if base % 4 != 0 {
            log::warn!("smz: rejected base {base:#010x}");
            return Err(ConfigError::InvalidAlignment(base));
        }
        self.config.base = base;
        log::info!("smz: base = {base:#010x}");
        Ok(())
    }

    /// Set the region size
    ///
    /// # Error
    ///
    /// * `ConfigError::InvalidSize` - `size` is zero or not a power of two
    pub fn set_size(&mut self, size: u32) -> Result<(), ConfigError> {
        if !size.is_power_of_two() {
            log::warn!("smz: rejected size {size:#x}");
            return Err(ConfigError::InvalidSize(size));
        }
        self.config.size = size;
        log::info!("smz: size = {size:#x}");
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        log::info!("smz: {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_key(&mut self, slot: KeySlot, val: u32) {
        self.config.keys[usize::from(slot)] = val;
        log::info!("smz: {slot} updated");
    }

    pub fn set_keys(&mut self, keys: [u32; 4]) {
        self.config.keys = keys;
        log::info!("smz: key registers updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let regs = ConfigRegisterFile::new();
        assert_eq!(regs.base(), 0);
        assert_eq!(regs.size(), 0);
        assert!(!regs.enabled());
        assert_eq!(regs.keys(), [0; 4]);
    }

    #[test]
    fn test_set_and_get() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_base(0x10000).unwrap();
        regs.set_size(0x1000).unwrap();
        regs.set_enabled(true);
        assert_eq!(
            regs.snapshot(),
            SecureRegionConfig {
                base: 0x10000,
                size: 0x1000,
                enabled: true,
                keys: [0; 4],
            }
        );
    }

    #[test]
    fn test_misaligned_base_rejected() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_base(0x2000).unwrap();
        assert_eq!(
            regs.set_base(0x1001),
            Err(ConfigError::InvalidAlignment(0x1001))
        );
        assert_eq!(regs.base(), 0x2000);
        assert_eq!(regs.set_base(0x1002), Err(ConfigError::InvalidAlignment(0x1002)));
        assert_eq!(regs.base(), 0x2000);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_size(0x800).unwrap();
        assert_eq!(regs.set_size(0x1234), Err(ConfigError::InvalidSize(0x1234)));
        assert_eq!(regs.size(), 0x800);
        assert_eq!(regs.set_size(0), Err(ConfigError::InvalidSize(0)));
        assert_eq!(regs.size(), 0x800);
        assert_eq!(regs.set_size(0x8000_0000), Ok(()));
    }

    #[test]
    fn test_failed_update_leaves_snapshot_unchanged() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_base(0x4000).unwrap();
        regs.set_size(0x100).unwrap();
        regs.set_enabled(true);
        let before = regs.snapshot();
        assert!(regs.set_base(0x4001).is_err());
        assert!(regs.set_size(0x101).is_err());
        assert_eq!(regs.snapshot(), before);
    }

    #[test]
    fn test_key_words_are_independent() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_key(KeySlot::Key2, 0x1234_5678);
        assert_eq!(regs.keys(), [0, 0, 0x1234_5678, 0]);
        regs.set_keys([1, 2, 3, 4]);
        assert_eq!(regs.key(KeySlot::Key0), 1);
        assert_eq!(regs.key(KeySlot::Key3), 4);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut regs = ConfigRegisterFile::new();
        regs.set_base(0x4000).unwrap();
        regs.set_enabled(true);
        regs.set_keys([u32::MAX; 4]);
        regs.reset();
        assert_eq!(regs.snapshot(), SecureRegionConfig::default());
    }

    #[test]
    fn test_display() {
        let config = SecureRegionConfig {
            base: 0x10000,
            size: 0x1000,
            enabled: true,
            keys: [0; 4],
        };
        assert_eq!(config.to_string(), "[0x00010000, +0x1000) enabled");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidAlignment(0x1001).to_string(),
            "secure region base 0x00001001 is not word aligned"
        );
        assert_eq!(
            ConfigError::InvalidSize(0x1234).to_string(),
            "secure region size 0x1234 is not a nonzero power of two"
        );
    }
}
