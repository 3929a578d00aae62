//! CSR bank: four 64-bit registers decoded from a configurable base.
//!
//! Decode rule: register index = `(addr − base) >> 3`, valid iff
//! `addr ≥ base` and the index is below [`regs::REG_COUNT`]. Out-of-window
//! reads return a [`DecodeError`] with unspecified payload; out-of-window
//! writes leave the bank untouched.

use riptide_chip::regs;

use crate::error::DecodeError;

const RUN_IDX: usize = (regs::RUN / regs::REG_STRIDE) as usize;
const ADDR_A_IDX: usize = (regs::ADDR_A / regs::REG_STRIDE) as usize;
const ADDR_B_IDX: usize = (regs::ADDR_B / regs::REG_STRIDE) as usize;
const COUNT_IDX: usize = (regs::COUNT / regs::REG_STRIDE) as usize;

/// The controller's register bank.
#[derive(Debug)]
pub struct CsrBank {
    base: u64,
    regs: [u64; regs::REG_COUNT],
}

impl CsrBank {
    /// Bank with all registers zero, decoded from `base`.
    #[must_use]
    pub fn new(base: u64) -> Self {
        Self { base, regs: [0; regs::REG_COUNT] }
    }

    /// Reset to power-on state and rebase the window.
    pub fn reset(&mut self, base: u64) {
        self.base = base;
        self.regs = [0; regs::REG_COUNT];
    }

    /// Service one read request. Never mutates state.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] when `addr` falls outside the register window.
    pub fn handle_read(&self, addr: u64) -> Result<u64, DecodeError> {
        let idx = self.index(addr)?;
        Ok(self.regs[idx])
    }

    /// Service one write request. On a decode error nothing is stored.
    ///
    /// # Errors
    ///
    /// [`DecodeError`] when `addr` falls outside the register window.
    pub fn handle_write(&mut self, addr: u64, data: u64) -> Result<(), DecodeError> {
        let idx = self.index(addr)?;
        tracing::trace!("csr write [{idx}] {addr:#x} <- {data:#x}");
        self.regs[idx] = data;
        Ok(())
    }

    fn index(&self, addr: u64) -> Result<usize, DecodeError> {
        regs::reg_index(self.base, addr).ok_or(DecodeError { addr, base: self.base })
    }

    /// Configured window base.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Current register values, in index order.
    #[must_use]
    pub fn snapshot(&self) -> [u64; regs::REG_COUNT] {
        self.regs
    }

    /// Run flag, as last written or cleared.
    #[must_use]
    pub fn run(&self) -> u64 {
        self.regs[RUN_IDX]
    }

    /// Base address of the array to sort.
    #[must_use]
    pub fn addr_a(&self) -> u64 {
        self.regs[ADDR_A_IDX]
    }

    /// Base address of the scratch array.
    #[must_use]
    pub fn addr_b(&self) -> u64 {
        self.regs[ADDR_B_IDX]
    }

    /// Element count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.regs[COUNT_IDX]
    }

    /// Completion side of the run-flag handshake: only the scheduler calls
    /// this, and only from its drain state.
    pub(crate) fn clear_run(&mut self) {
        self.regs[RUN_IDX] = regs::run::IDLE;
    }
}
