//! CSR window for the RT64 sort controller.
//!
//! Four 64-bit registers at an 8-byte stride from a base address fixed at
//! initialisation:
//!
//! ```text
//! offset  name    meaning
//! ──────  ──────  ─────────────────────────────────────────────────────
//!  0x00   RUN     0 = idle, 1 = start; cleared by hardware on completion
//!  0x08   ADDR_A  base address of the array to sort
//!  0x10   ADDR_B  base address of the scratch array, same size as A
//!  0x18   COUNT   element count
//! ```
//!
//! An access below the base or at index ≥ 4 is a decode error: reads return
//! an error status with unspecified payload, writes have no effect.

/// Number of registers in the window.
pub const REG_COUNT: usize = 4;

/// Byte stride between consecutive registers.
pub const REG_STRIDE: u64 = 8;

/// Total decoded window size in bytes.
pub const WINDOW_BYTES: u64 = REG_COUNT as u64 * REG_STRIDE;

/// Run flag — write `run::START` to launch a sort.
pub const RUN: u64 = 0x00;

/// Base address of the array to sort. The result always lands here.
pub const ADDR_A: u64 = 0x08;

/// Base address of the scratch array. Must be as large as the A array.
pub const ADDR_B: u64 = 0x10;

/// Element count (64-bit words).
pub const COUNT: u64 = 0x18;

/// Run register values.
pub mod run {
    /// Controller idle; registers safe to reprogram.
    pub const IDLE: u64 = 0;
    /// Start a run. The controller clears the flag when the sort completes.
    pub const START: u64 = 1;
}

/// Register index for access address `addr`, or `None` when the address
/// falls outside the window.
///
/// The shift discards the low three bits — alignment is not validated, a
/// misaligned access simply decodes to the register it lands in.
#[must_use]
pub const fn reg_index(base: u64, addr: u64) -> Option<usize> {
    if addr < base {
        return None;
    }
    let idx = ((addr - base) / REG_STRIDE) as usize;
    if idx < REG_COUNT {
        Some(idx)
    } else {
        None
    }
}
