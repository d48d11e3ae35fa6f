/*++

Licensed under the Apache-2.0 license.

File Name:

    emu_csr.rs

Abstract:

    File contains the CSR instruction backend that lets the SMZ driver run
    against the emulated register file.

--*/

use smz_drivers::{CsrAccess, SmzError, SmzResult};
use smz_emu_periph::{ConfigError, ConfigRegisterFile, CsrError, CsrOp};

/// CSR port onto an emulated Secure Memory Zone register file
pub struct EmuCsr<'a> {
    regs: &'a mut ConfigRegisterFile,
}

impl<'a> EmuCsr<'a> {
    pub fn new(regs: &'a mut ConfigRegisterFile) -> Self {
        Self { regs }
    }
}

fn driver_error(err: CsrError) -> SmzError {
    log::warn!("csr: {err}");
    match err {
        CsrError::Rejected(ConfigError::InvalidAlignment(_)) => SmzError::InvalidAlignment,
        CsrError::Rejected(ConfigError::InvalidSize(_)) => SmzError::InvalidSize,
        CsrError::IllegalRegister(_) => SmzError::CsrFault,
    }
}

impl CsrAccess for EmuCsr<'_> {
    fn read_csr(&mut self, csr: u32) -> SmzResult<u32> {
        self.regs.read_csr(csr).map_err(driver_error)
    }

    fn write_csr(&mut self, csr: u32, val: u32) -> SmzResult<()> {
        self.regs.write_csr(csr, val).map_err(driver_error)
    }

    fn set_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32> {
        self.regs
            .exec_csr(CsrOp::ReadSet, csr, mask)
            .map_err(driver_error)
    }

    fn clear_csr_bits(&mut self, csr: u32, mask: u32) -> SmzResult<u32> {
        self.regs
            .exec_csr(CsrOp::ReadClear, csr, mask)
            .map_err(driver_error)
    }

    fn settle(&mut self, cycles: u32) {
        // The emulated register file has no pipeline to drain.
        log::trace!("csr: settle {cycles} cycles");
    }
}
