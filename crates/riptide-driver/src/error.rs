//! Error types for the Riptide device model.

use thiserror::Error;

/// Result type alias for Riptide operations.
pub type Result<T> = std::result::Result<T, RiptideError>;

/// Bus decode failure: the access address did not map to any register.
///
/// Carried as the status of a bus response. Never fatal — a decode error
/// does not touch the run flag or the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address {addr:#x} outside register window at {base:#x}")]
pub struct DecodeError {
    /// Offending access address.
    pub addr: u64,
    /// Configured window base.
    pub base: u64,
}

/// Errors that can occur while driving the device model.
#[derive(Debug, Error)]
pub enum RiptideError {
    /// A register access fell outside the CSR window.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The engine touched memory outside the modelled window.
    #[error("{access} fault at {addr:#x} (memory window {base:#x}..{end:#x})")]
    MemFault {
        /// Access kind, `"load"` or `"store"`.
        access: &'static str,
        /// Faulting byte address.
        addr: u64,
        /// Window base.
        base: u64,
        /// Window end (exclusive).
        end: u64,
    },

    /// A word access that is not 8-byte aligned.
    #[error("misaligned word access at {addr:#x}")]
    Misaligned {
        /// Faulting byte address.
        addr: u64,
    },

    /// The device did not complete within the tick budget.
    #[error("run did not complete within {ticks} ticks")]
    Timeout {
        /// Tick budget that was exhausted.
        ticks: u64,
    },

    /// A host-side configuration problem.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for rejection.
        reason: String,
    },
}

impl RiptideError {
    /// Create a memory fault error.
    pub fn mem_fault(access: &'static str, addr: u64, base: u64, end: u64) -> Self {
        Self::MemFault { access, addr, base, end }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}
