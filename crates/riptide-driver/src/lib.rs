//! Device model for the Riptide RT64 merge-sort accelerator.
//!
//! The RT64 sorts an array of 64-bit words with an iterative bottom-up
//! merge: software programs two equally sized buffers and an element count
//! into a four-register CSR window, sets the run flag, and polls it back to
//! zero. Inside, a pass scheduler walks span-doubling passes, dispatches
//! one merge task per span-pair to the merge engine, double-buffering
//! between the two arrays, and issues a final copy-back when the result
//! ends up in the scratch buffer.
//!
//! ```text
//!  host software
//!      │  read/write requests (FIFO per channel)
//!      ▼
//!  BusTransactor ──► CsrBank (run, addr_A, addr_B, n)
//!                        │ run flag
//!                        ▼
//!                  PassScheduler ──► MergeEngine ──► Memory
//!                   (8 states)        start/done      (engine-mastered)
//! ```
//!
//! # Quick start
//!
//! ```
//! use riptide_driver::SortExecutor;
//!
//! let mut data = vec![5_u64, 1, 4, 2, 3];
//! let report = SortExecutor::default().sort(&mut data)?;
//! assert_eq!(data, [1, 2, 3, 4, 5]);
//! assert_eq!(report.passes, 3);
//! # Ok::<(), riptide_driver::RiptideError>(())
//! ```
//!
//! For register-level control, build a [`SortDevice`] over an engine and
//! drive the bus queues directly; [`write_reg`]/[`read_reg`] wrap the
//! request/response handshake.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod bus;
pub mod csr;
mod device;
mod engine;
pub mod engines;
mod error;
mod executor;
pub mod mem;
pub mod sched;

pub use bus::{BusTransactor, ReadReq, ReadResp, WriteReq, WriteResp};
pub use csr::CsrBank;
pub use device::SortDevice;
pub use engine::{MasterId, MergeEngine};
pub use engines::{RecordingEngine, SoftwareEngine};
pub use error::{DecodeError, Result, RiptideError};
pub use executor::{read_reg, write_reg, SortConfig, SortExecutor, SortReport};
pub use mem::Memory;
pub use sched::PassScheduler;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        MasterId, Memory, MergeEngine, RecordingEngine, Result, RiptideError, SoftwareEngine,
        SortConfig, SortDevice, SortExecutor, SortReport,
    };
    pub use riptide_chip::{regs, MergeTask, Step};
}
