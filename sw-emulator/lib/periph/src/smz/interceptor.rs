/*++

Licensed under the Apache-2.0 license.

File Name:

    interceptor.rs

Abstract:

    File contains the Secure Memory Zone bus interceptor, the synchronous
    adapter that sits between the CPU and memory and applies the cipher to
    secure region traffic.

--*/

use super::cipher::CipherPipeline;
use super::config::ConfigRegisterFile;
use super::guard::AddressRangeGuard;
use super::keystream::{KeyManager, Keystream, KeystreamMode};
use smlang::statemachine;
use smz_emu_bus::{Bus, BusError};
use smz_emu_types::{ByteEnable, RvAddr, RvData, RvSize};

/// One CPU-side access as presented to the interceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccessRequest {
    /// Word-aligned target address
    pub address: RvAddr,

    /// Store when set, load otherwise
    pub is_write: bool,

    /// Store data; ignored for loads
    pub data: RvData,

    /// Active byte lanes
    pub byte_enable: ByteEnable,
}

impl MemoryAccessRequest {
    pub fn read(address: RvAddr, byte_enable: ByteEnable) -> Self {
        Self {
            address,
            is_write: false,
            data: 0,
            byte_enable,
        }
    }

    pub fn write(address: RvAddr, data: RvData, byte_enable: ByteEnable) -> Self {
        Self {
            address,
            is_write: true,
            data,
            byte_enable,
        }
    }
}

/// Word returned by the memory side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccessResponse {
    pub data: RvData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterceptError {
    /// Event arrived in a state that does not accept it
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// Memory side faulted; the pending access was dropped
    #[error("memory side faulted: {0}")]
    Memory(#[from] BusError),
}

impl InterceptError {
    /// Bus exception reported to the CPU for a failed access
    fn into_bus_error(self, is_write: bool) -> BusError {
        match (self, is_write) {
            (InterceptError::Memory(err), _) => err,
            (InterceptError::ProtocolViolation(_), false) => BusError::LoadAccessFault,
            (InterceptError::ProtocolViolation(_), true) => BusError::StoreAccessFault,
        }
    }
}

/// Access latched between issue and completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAccess {
    request: MemoryAccessRequest,

    /// Present only for secure region accesses
    keystream: Option<Keystream>,
}

statemachine! {
    transitions: {
        // CurrentState Event / action = NextState

        *Idle + Issue(PendingAccess) / latch = Forwarding,
        Forwarding + Complete / release = Idle,
        Forwarding + Abort / release = Idle,
    }
}

#[derive(Debug, Default)]
pub struct Context {
    pending: Option<PendingAccess>,
}

impl StateMachineContext for Context {
    fn latch(&mut self, access: &PendingAccess) {
        self.pending = Some(*access);
    }

    fn release(&mut self) {
        self.pending = None;
    }
}

/// Transparent encryption layer in front of a memory bus.
///
/// Accesses that fall in the configured secure region are encrypted on the
/// way to memory and decrypted on the way back. Everything else passes
/// through untouched. At most one access is in flight.
pub struct BusInterceptor<TBus: Bus> {
    regs: ConfigRegisterFile,
    keys: KeyManager,
    memory: TBus,
    state_machine: StateMachine<Context>,
}

impl<TBus: Bus> BusInterceptor<TBus> {
    /// Create an interceptor in front of `memory` with the reset configuration
    pub fn new(memory: TBus, mode: KeystreamMode) -> Self {
        Self {
            regs: ConfigRegisterFile::new(),
            keys: KeyManager::new(mode),
            memory,
            state_machine: StateMachine::new(Context::default()),
        }
    }

    pub fn regs(&self) -> &ConfigRegisterFile {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut ConfigRegisterFile {
        &mut self.regs
    }

    /// Memory behind the interceptor. Reads through this bypass the cipher.
    pub fn memory(&self) -> &TBus {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut TBus {
        &mut self.memory
    }

    pub fn into_memory(self) -> TBus {
        self.memory
    }

    pub fn mode(&self) -> KeystreamMode {
        self.keys.mode()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state_machine.state, States::Idle)
    }

    /// Accept a CPU request and return the request to forward to memory.
    ///
    /// Write data is encrypted when the address is in the secure region.
    /// Address and byte enable are forwarded unchanged.
    ///
    /// # Error
    ///
    /// * `InterceptError::ProtocolViolation` - an access is already in flight
    ///   or the address is not word aligned
    pub fn issue(
        &mut self,
        request: MemoryAccessRequest,
    ) -> Result<MemoryAccessRequest, InterceptError> {
        if !RvSize::Word.is_aligned(request.address) {
            log::warn!("smz: issue at unaligned {:#010x}", request.address);
            return Err(InterceptError::ProtocolViolation("address not word aligned"));
        }

        let cfg = self.regs.snapshot();
        let keystream = AddressRangeGuard::contains(request.address, &cfg)
            .then(|| self.keys.keystream(request.address, &cfg));

        let access = PendingAccess { request, keystream };
        if self
            .state_machine
            .process_event(Events::Issue(access))
            .is_err()
        {
            log::warn!("smz: issue while an access is in flight");
            return Err(InterceptError::ProtocolViolation("access already in flight"));
        }

        let mut downstream = request;
        if let (true, Some(ks)) = (request.is_write, keystream) {
            downstream.data = CipherPipeline::encrypt(request.data, ks);
        }
        log::debug!(
            "smz: {} {:#010x} be={} {} data={:#010x}",
            if request.is_write { "wr" } else { "rd" },
            request.address,
            request.byte_enable,
            if keystream.is_some() { "secure" } else { "plain" },
            downstream.data,
        );
        Ok(downstream)
    }

    /// Complete the access in flight with the word returned by memory.
    ///
    /// Loads from the secure region are decrypted; everything else is
    /// returned as is.
    ///
    /// # Error
    ///
    /// * `InterceptError::ProtocolViolation` - no access is in flight
    pub fn complete(
        &mut self,
        response: MemoryAccessResponse,
    ) -> Result<MemoryAccessResponse, InterceptError> {
        let pending = self.state_machine.context.pending;
        if self.state_machine.process_event(Events::Complete).is_err() {
            log::warn!("smz: completion with no access in flight");
            return Err(InterceptError::ProtocolViolation("no access in flight"));
        }

        let data = match pending {
            Some(PendingAccess {
                request,
                keystream: Some(ks),
            }) if !request.is_write => CipherPipeline::decrypt(response.data, ks),
            _ => response.data,
        };
        Ok(MemoryAccessResponse { data })
    }

    /// Drop the access in flight, if any
    pub fn abort(&mut self) {
        if self.state_machine.process_event(Events::Abort).is_ok() {
            log::debug!("smz: access aborted");
        }
    }

    /// Run one access end to end: issue, forward to memory, complete.
    ///
    /// # Error
    ///
    /// * `InterceptError::ProtocolViolation` - see `issue`
    /// * `InterceptError::Memory` - the memory side faulted; nothing is left
    ///   in flight
    pub fn transact(
        &mut self,
        request: MemoryAccessRequest,
    ) -> Result<MemoryAccessResponse, InterceptError> {
        let downstream = self.issue(request)?;
        let result = if downstream.is_write {
            self.memory
                .write_strobed(downstream.address, downstream.data, downstream.byte_enable)
                .map(|()| 0)
        } else {
            self.memory.read(RvSize::Word, downstream.address)
        };

        match result {
            Ok(data) => self.complete(MemoryAccessResponse { data }),
            Err(err) => {
                log::warn!("smz: memory fault {err} at {:#010x}", downstream.address);
                self.abort();
                Err(err.into())
            }
        }
    }
}

impl<TBus: Bus> Bus for BusInterceptor<TBus> {
    /// Load `size` bytes. The whole word is read and the lanes extracted.
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if !size.is_aligned(addr) {
            return Err(BusError::LoadAddrMisaligned);
        }
        let request = MemoryAccessRequest::read(addr & !0b11, ByteEnable::for_access(size, addr));
        let response = self
            .transact(request)
            .map_err(|err| err.into_bus_error(false))?;
        Ok((response.data >> (8 * (addr & 0b11))) & size.data_mask())
    }

    /// Store `size` bytes. The value is replicated into every lane and the
    /// strobe selects the ones written.
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if !size.is_aligned(addr) {
            return Err(BusError::StoreAddrMisaligned);
        }
        let word = match size {
            RvSize::Byte => (val & 0xFF).wrapping_mul(0x0101_0101),
            RvSize::HalfWord => (val & 0xFFFF).wrapping_mul(0x0001_0001),
            RvSize::Word => val,
        };
        self.write_strobed(addr & !0b11, word, ByteEnable::for_access(size, addr))
    }

    fn write_strobed(
        &mut self,
        addr: RvAddr,
        val: RvData,
        byte_enable: ByteEnable,
    ) -> Result<(), BusError> {
        if !RvSize::Word.is_aligned(addr) {
            return Err(BusError::StoreAddrMisaligned);
        }
        self.transact(MemoryAccessRequest::write(addr, val, byte_enable))
            .map(|_| ())
            .map_err(|err| err.into_bus_error(true))
    }

    fn warm_reset(&mut self) {
        self.regs.reset();
        self.state_machine = StateMachine::new(Context::default());
        self.memory.warm_reset();
    }
}
