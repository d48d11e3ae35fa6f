/*++

Licensed under the Apache-2.0 license.

File Name:

    smz.rs

Abstract:

    File contains API for the Secure Memory Zone controls.

--*/

use core::fmt;

/// Region base address CSR
pub const SMZ_CSR_BASE: u32 = 0x200;

/// Region size CSR
pub const SMZ_CSR_SIZE: u32 = 0x201;

/// Enable CSR
pub const SMZ_CSR_ENABLE: u32 = 0x202;

/// First of the four key word CSRs
pub const SMZ_CSR_KEY0: u32 = 0x203;

/// Busy-wait iterations between disabling the region and rewriting it
pub const SETTLE_CYCLES: u32 = 10;

crate::driver_err_def! {
    Smz,
    SmzError
    {
        /// Base address is not word aligned
        InvalidAlignment = 0x01,

        /// Size is zero or not a power of two
        InvalidSize = 0x02,

        /// CSR instruction failed
        CsrFault = 0x03,
    }
}

pub type SmzResult<T> = Result<T, SmzError>;

bitflags::bitflags! {
    /// ENABLE CSR bits
    pub struct EnableFlags: u32 {
        const EN = 0b1;
    }
}

/// CSR instructions as issued by the core
pub trait CsrAccess {
    /// csrr
    fn read_csr(&mut self, csr: u32) -> SmzResult<u32>;

    /// csrw
    fn write_csr(&mut self, csr: u32, val: u32) -> SmzResult<()>;

    /// csrrs; returns the previous value
    fn set_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32>;

    /// csrrc; returns the previous value
    fn clear_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32>;

    /// csrrc with every bit set
    fn read_and_clear_csr(&mut self, csr: u32) -> SmzResult<u32> {
        self.clear_csr_bits(csr, u32::MAX)
    }

    /// Wait roughly `cycles` core cycles
    fn settle(&mut self, cycles: u32) {
        for _ in 0..cycles {
            core::hint::spin_loop();
        }
    }
}

/// Region configuration as read back from the CSRs
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SmzConfig {
    pub base: u32,
    pub size: u32,
    pub enabled: bool,
}

impl fmt::Display for SmzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SMZ Configuration:")?;
        writeln!(f, "  Base Address: 0x{:08x}", self.base)?;
        writeln!(f, "  Region Size:  0x{:08x} ({} bytes)", self.size, self.size)?;
        write!(
            f,
            "  Status:       {}",
            if self.enabled { "ENABLED" } else { "DISABLED" }
        )
    }
}

/// Secure Memory Zone driver
pub struct Smz<C: CsrAccess> {
    csr: C,
}

impl<C: CsrAccess> Smz<C> {
    pub fn new(csr: C) -> Self {
        Self { csr }
    }

    pub fn csr(&self) -> &C {
        &self.csr
    }

    pub fn csr_mut(&mut self) -> &mut C {
        &mut self.csr
    }

    pub fn into_inner(self) -> C {
        self.csr
    }

    /// Program the region and optionally enable it.
    ///
    /// Both values are checked before any CSR is touched.
    ///
    /// # Arguments
    ///
    /// * `base` - Region base, word aligned
    /// * `size` - Region size, a nonzero power of two
    /// * `enable` - Enable the region once programmed
    pub fn init(&mut self, base: u32, size: u32, enable: bool) -> SmzResult<()> {
        Self::validate(base, size)?;

        self.disable()?;
        self.csr.settle(SETTLE_CYCLES);
        self.csr.write_csr(SMZ_CSR_BASE, base)?;
        self.csr.write_csr(SMZ_CSR_SIZE, size)?;

        if enable {
            self.enable()?;
        }
        Ok(())
    }

    /// Move or resize the region, restoring the enable state afterwards.
    ///
    /// # Arguments
    ///
    /// * `base` - New region base, word aligned
    /// * `size` - New region size, a nonzero power of two
    pub fn reconfigure(&mut self, base: u32, size: u32) -> SmzResult<()> {
        Self::validate(base, size)?;

        let was_enabled = self.is_enabled()?;
        self.disable()?;
        self.csr.settle(SETTLE_CYCLES);
        self.csr.write_csr(SMZ_CSR_BASE, base)?;
        self.csr.write_csr(SMZ_CSR_SIZE, size)?;

        if was_enabled {
            self.enable()?;
        }
        Ok(())
    }

    pub fn config(&mut self) -> SmzResult<SmzConfig> {
        Ok(SmzConfig {
            base: self.csr.read_csr(SMZ_CSR_BASE)?,
            size: self.csr.read_csr(SMZ_CSR_SIZE)?,
            enabled: self.is_enabled()?,
        })
    }

    pub fn enable(&mut self) -> SmzResult<()> {
        self.csr
            .set_csr_bits(SMZ_CSR_ENABLE, EnableFlags::EN.bits())
            .map(|_| ())
    }

    pub fn disable(&mut self) -> SmzResult<()> {
        self.csr
            .clear_csr_bits(SMZ_CSR_ENABLE, EnableFlags::EN.bits())
            .map(|_| ())
    }

    pub fn is_enabled(&mut self) -> SmzResult<bool> {
        let val = self.csr.read_csr(SMZ_CSR_ENABLE)?;
        Ok(EnableFlags::from_bits_truncate(val).contains(EnableFlags::EN))
    }

    /// Load the four key words
    pub fn set_keys(&mut self, keys: &[u32; 4]) -> SmzResult<()> {
        for (csr, key) in (SMZ_CSR_KEY0..).zip(keys.iter()) {
            self.csr.write_csr(csr, *key)?;
        }
        Ok(())
    }

    pub fn keys(&mut self) -> SmzResult<[u32; 4]> {
        let mut keys = [0u32; 4];
        for (csr, key) in (SMZ_CSR_KEY0..).zip(keys.iter_mut()) {
            *key = self.csr.read_csr(csr)?;
        }
        Ok(keys)
    }

    fn validate(base: u32, size: u32) -> SmzResult<()> {
        if base & 0x3 != 0 {
            return Err(SmzError::InvalidAlignment);
        }
        if !size.is_power_of_two() {
            return Err(SmzError::InvalidSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fmt::Write;

    /// CSR file that records every instruction it sees
    #[derive(Default)]
    struct FakeCsr {
        regs: HashMap<u32, u32>,
        log: String,
        fail: bool,
    }

    impl FakeCsr {
        fn reg(&self, csr: u32) -> u32 {
            self.regs.get(&csr).copied().unwrap_or(0)
        }

        fn check(&self) -> SmzResult<()> {
            if self.fail {
                Err(SmzError::CsrFault)
            } else {
                Ok(())
            }
        }
    }

    impl CsrAccess for FakeCsr {
        fn read_csr(&mut self, csr: u32) -> SmzResult<u32> {
            self.check()?;
            writeln!(self.log, "csrr {csr:#x}").unwrap();
            Ok(self.reg(csr))
        }

        fn write_csr(&mut self, csr: u32, val: u32) -> SmzResult<()> {
            self.check()?;
            writeln!(self.log, "csrw {csr:#x}, {val:#x}").unwrap();
            self.regs.insert(csr, val);
            Ok(())
        }

        fn set_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32> {
            self.check()?;
            writeln!(self.log, "csrrs {csr:#x}, {mask:#x}").unwrap();
            let old = self.reg(csr);
            self.regs.insert(csr, old | mask);
            Ok(old)
        }

        fn clear_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32> {
            self.check()?;
            writeln!(self.log, "csrrc {csr:#x}, {mask:#x}").unwrap();
            let old = self.reg(csr);
            self.regs.insert(csr, old & !mask);
            Ok(old)
        }

        fn settle(&mut self, cycles: u32) {
            writeln!(self.log, "settle {cycles}").unwrap();
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut smz = Smz::new(FakeCsr::default());
        smz.init(0x10000, 0x1000, true).unwrap();
        assert_eq!(
            smz.csr().log,
            "csrrc 0x202, 0x1\n\
             settle 10\n\
             csrw 0x200, 0x10000\n\
             csrw 0x201, 0x1000\n\
             csrrs 0x202, 0x1\n"
        );
        assert_eq!(
            smz.config(),
            Ok(SmzConfig {
                base: 0x10000,
                size: 0x1000,
                enabled: true,
            })
        );
    }

    #[test]
    fn test_init_without_enable() {
        let mut smz = Smz::new(FakeCsr::default());
        smz.init(0x4000, 0x100, false).unwrap();
        assert!(!smz.csr().log.contains("csrrs"));
        assert_eq!(smz.is_enabled(), Ok(false));
    }

    #[test]
    fn test_init_validates_before_touching_csrs() {
        let mut smz = Smz::new(FakeCsr::default());
        assert_eq!(smz.init(0x1001, 0x1000, true), Err(SmzError::InvalidAlignment));
        assert_eq!(smz.init(0x1000, 0x1234, true), Err(SmzError::InvalidSize));
        assert_eq!(smz.init(0x1000, 0, true), Err(SmzError::InvalidSize));
        assert_eq!(smz.csr().log, "");
    }

    #[test]
    fn test_reconfigure_restores_enable() {
        let mut smz = Smz::new(FakeCsr::default());
        smz.init(0x10000, 0x1000, true).unwrap();
        smz.csr_mut().log.clear();

        smz.reconfigure(0x20000, 0x2000).unwrap();
        assert_eq!(
            smz.csr().log,
            "csrr 0x202\n\
             csrrc 0x202, 0x1\n\
             settle 10\n\
             csrw 0x200, 0x20000\n\
             csrw 0x201, 0x2000\n\
             csrrs 0x202, 0x1\n"
        );
        assert_eq!(smz.is_enabled(), Ok(true));
    }

    #[test]
    fn test_reconfigure_keeps_disabled() {
        let mut smz = Smz::new(FakeCsr::default());
        smz.init(0x10000, 0x1000, false).unwrap();
        smz.reconfigure(0x8000, 0x800).unwrap();
        assert_eq!(
            smz.config(),
            Ok(SmzConfig {
                base: 0x8000,
                size: 0x800,
                enabled: false,
            })
        );
        assert_eq!(smz.reconfigure(0x8002, 0x800), Err(SmzError::InvalidAlignment));
    }

    #[test]
    fn test_keys() {
        let mut smz = Smz::new(FakeCsr::default());
        smz.set_keys(&[1, 2, 3, 4]).unwrap();
        assert_eq!(smz.keys(), Ok([1, 2, 3, 4]));
        assert_eq!(smz.csr().reg(0x206), 4);
    }

    #[test]
    fn test_csr_fault_propagates() {
        let mut smz = Smz::new(FakeCsr {
            fail: true,
            ..Default::default()
        });
        assert_eq!(smz.init(0x10000, 0x1000, true), Err(SmzError::CsrFault));
        assert_eq!(smz.config(), Err(SmzError::CsrFault));
    }

    #[test]
    fn test_default_read_and_clear() {
        let mut csr = FakeCsr::default();
        csr.write_csr(SMZ_CSR_ENABLE, 1).unwrap();
        assert_eq!(csr.read_and_clear_csr(SMZ_CSR_ENABLE), Ok(1));
        assert_eq!(csr.reg(SMZ_CSR_ENABLE), 0);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SmzError::InvalidAlignment.code(), 0x0100_0001);
        assert_eq!(u32::from(SmzError::CsrFault), 0x0100_0003);
    }

    #[test]
    fn test_config_report() {
        let config = SmzConfig {
            base: 0x10000,
            size: 0x1000,
            enabled: true,
        };
        assert_eq!(
            config.to_string(),
            "SMZ Configuration:\n  Base Address: 0x00010000\n  Region Size:  0x00001000 (4096 bytes)\n  Status:       ENABLED"
        );
        assert!(SmzConfig::default().to_string().ends_with("DISABLED"));
    }
}
