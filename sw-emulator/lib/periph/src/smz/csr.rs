/*++

Licensed under the Apache-2.0 license.

File Name:

    csr.rs

Abstract:

    File contains the CSR view of the Secure Memory Zone register file, as
    reached by the csrrw/csrrs/csrrc instructions.

--*/

use super::config::{ConfigError, ConfigRegisterFile, KeySlot};
use smz_emu_types::{emu_enum, RvAddr, RvData};
use tock_registers::{register_bitfields, LocalRegisterCopy};

register_bitfields! [
    u32,
    Enable [
        EN OFFSET(0) NUMBITS(1) [],
    ],
];

emu_enum!(
    /// Secure Memory Zone CSR numbers
    #[derive(Debug, Eq, PartialEq, Copy, Clone)]
    pub SmzCsr;
    RvAddr;
    {
        /// Region base address
        Base = 0x200,

        /// Region size
        Size = 0x201,

        /// Enable flag
        Enable = 0x202,

        /// Key word 0
        Key0 = 0x203,

        /// Key word 1
        Key1 = 0x204,

        /// Key word 2
        Key2 = 0x205,

        /// Key word 3
        Key3 = 0x206,
    }
);

/// CSR instruction flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrOp {
    /// csrrw: replace the value
    ReadWrite,

    /// csrrs: set the operand bits
    ReadSet,

    /// csrrc: clear the operand bits
    ReadClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CsrError {
    /// CSR number not implemented by the Secure Memory Zone
    #[error("CSR {0:#05x} is not implemented")]
    IllegalRegister(RvAddr),

    /// Value rejected by the register file; nothing was written
    #[error(transparent)]
    Rejected(#[from] ConfigError),
}

impl ConfigRegisterFile {
    /// Read the specified configuration status register
    ///
    /// # Error
    ///
    /// * `CsrError::IllegalRegister` - `csr` is not an SMZ register
    pub fn read_csr(&self, csr: RvAddr) -> Result<RvData, CsrError> {
        let csr = SmzCsr::try_from(csr).map_err(CsrError::IllegalRegister)?;
        let val = match csr {
            SmzCsr::Base => self.base(),
            SmzCsr::Size => self.size(),
            SmzCsr::Enable => {
                let mut reg = LocalRegisterCopy::<u32, Enable::Register>::new(0);
                reg.modify(Enable::EN.val(self.enabled() as u32));
                reg.get()
            }
            SmzCsr::Key0 => self.key(KeySlot::Key0),
            SmzCsr::Key1 => self.key(KeySlot::Key1),
            SmzCsr::Key2 => self.key(KeySlot::Key2),
            SmzCsr::Key3 => self.key(KeySlot::Key3),
        };
        Ok(val)
    }

    /// Write the specified configuration status register
    ///
    /// Writes to ENABLE only look at bit 0.
    ///
    /// # Error
    ///
    /// * `CsrError::IllegalRegister` - `csr` is not an SMZ register
    /// * `CsrError::Rejected` - the value failed validation, state unchanged
    pub fn write_csr(&mut self, csr: RvAddr, val: RvData) -> Result<(), CsrError> {
        let csr = SmzCsr::try_from(csr).map_err(CsrError::IllegalRegister)?;
        match csr {
            SmzCsr::Base => self.set_base(val)?,
            SmzCsr::Size => self.set_size(val)?,
            SmzCsr::Enable => {
                let reg = LocalRegisterCopy::<u32, Enable::Register>::new(val);
                self.set_enabled(reg.is_set(Enable::EN));
            }
            SmzCsr::Key0 => self.set_key(KeySlot::Key0, val),
            SmzCsr::Key1 => self.set_key(KeySlot::Key1, val),
            SmzCsr::Key2 => self.set_key(KeySlot::Key2, val),
            SmzCsr::Key3 => self.set_key(KeySlot::Key3, val),
        }
        Ok(())
    }

    /// Execute a CSR instruction against the register file and return the
    /// value the register held before it.
    ///
    /// As with `rs1 = x0`, a set or clear with a zero operand only reads.
    ///
    /// # Error
    ///
    /// * `CsrError::IllegalRegister` - `csr` is not an SMZ register
    /// * `CsrError::Rejected` - the new value failed validation, state unchanged
    pub fn exec_csr(&mut self, op: CsrOp, csr: RvAddr, operand: RvData) -> Result<RvData, CsrError> {
        let old = self.read_csr(csr)?;
        let new = match op {
            CsrOp::ReadWrite => operand,
            CsrOp::ReadSet => old | operand,
            CsrOp::ReadClear => old & !operand,
        };
        if op == CsrOp::ReadWrite || operand != 0 {
            self.write_csr(csr, new)?;
        }
        Ok(old)
    }
}
