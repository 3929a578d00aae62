//! Host-side sort executor.
//!
//! Models the software that sits above the register bus: stage the input,
//! program the CSRs, set the run flag, poll it back to zero while the
//! device ticks, then read the result out of the A buffer. All register
//! traffic goes through the bus transactor queues exactly as real host
//! software would issue it.

use riptide_chip::{regs, Step};

use crate::device::SortDevice;
use crate::engine::MergeEngine;
use crate::engines::{RecordingEngine, SoftwareEngine};
use crate::error::{Result, RiptideError};
use crate::mem::Memory;

/// Ticks to wait for a single register response. Requests are serviced one
/// per tick, so with one request outstanding this never trips.
const RESP_TICKS: u64 = 8;

/// Placement and budget parameters for one sort run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Device identifier passed to `init`.
    pub device_id: u32,
    /// CSR window base.
    pub csr_base: u64,
    /// CSR window limit, forwarded to `init` (stored, unused by decode).
    pub csr_limit: u64,
    /// A-buffer base address (input and final result).
    pub addr_a: u64,
    /// Scratch-buffer base address; 0 places it right after the A buffer.
    pub addr_b: u64,
    /// Merge tasks the engine retires per tick.
    pub engine_width: usize,
    /// Abort the run after this many device ticks.
    pub max_ticks: u64,
    /// Ticks between run-flag polls.
    pub poll_interval: u64,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            csr_base: 0x9000_0000,
            csr_limit: 0x9000_1000,
            addr_a: 0x1000,
            addr_b: 0,
            engine_width: 1,
            max_ticks: 10_000_000,
            poll_interval: 8,
        }
    }
}

/// Statistics of one completed run.
#[derive(Debug, Clone, Copy)]
pub struct SortReport {
    /// Element count sorted.
    pub n: usize,
    /// Device ticks from init to observed completion.
    pub ticks: u64,
    /// Merge passes performed.
    pub passes: u32,
    /// Merge tasks dispatched (copy-back excluded).
    pub merge_tasks: u64,
    /// Whether the final copy-back task fired.
    pub copy_back: bool,
}

/// Drives complete sort runs against a freshly built device model.
#[derive(Debug, Default)]
pub struct SortExecutor {
    cfg: SortConfig,
}

impl SortExecutor {
    /// Executor with explicit placement/budget parameters.
    #[must_use]
    pub fn new(cfg: SortConfig) -> Self {
        Self { cfg }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SortConfig {
        &self.cfg
    }

    /// Sort `data` in place through the simulated accelerator.
    ///
    /// # Errors
    ///
    /// Misplaced buffers ([`RiptideError::InvalidConfig`]), engine memory
    /// faults, decode errors on register traffic, or an exhausted tick
    /// budget ([`RiptideError::Timeout`]).
    pub fn sort(&self, data: &mut [u64]) -> Result<SortReport> {
        let cfg = &self.cfg;
        let n = data.len() as u64;
        let addr_a = cfg.addr_a;
        // Auto-placement keeps B distinct from A even for an empty input, so
        // the scratch buffer never aliases the result buffer.
        let addr_b = if cfg.addr_b == 0 { addr_a + n.max(1) * 8 } else { cfg.addr_b };
        if addr_a % 8 != 0 || addr_b % 8 != 0 {
            return Err(RiptideError::invalid_config(format!(
                "buffers must be 8-byte aligned (A {addr_a:#x}, B {addr_b:#x})"
            )));
        }

        // One window covering both buffers; the engine masters all of it.
        let lo = addr_a.min(addr_b);
        let hi = addr_a.max(addr_b) + n * 8;
        let mem = Memory::new(lo, ((hi - lo) / 8) as usize);
        let engine = RecordingEngine::new(
            SoftwareEngine::new(mem).with_width(cfg.engine_width),
        );
        let mut dev = SortDevice::new(engine);
        dev.init(cfg.device_id, cfg.csr_base, cfg.csr_limit);
        dev.engine_mut().inner_mut().memory_mut().store_words(addr_a, data)?;

        write_reg(&mut dev, cfg.csr_base + regs::ADDR_A, addr_a)?;
        write_reg(&mut dev, cfg.csr_base + regs::ADDR_B, addr_b)?;
        write_reg(&mut dev, cfg.csr_base + regs::COUNT, n)?;
        write_reg(&mut dev, cfg.csr_base + regs::RUN, regs::run::START)?;

        loop {
            for _ in 0..cfg.poll_interval {
                dev.tick()?;
            }
            if read_reg(&mut dev, cfg.csr_base + regs::RUN)? == regs::run::IDLE {
                break;
            }
            if dev.ticks() > cfg.max_ticks {
                return Err(RiptideError::Timeout { ticks: cfg.max_ticks });
            }
        }
        debug_assert_eq!(dev.step(), Step::Idle);

        let out = dev.engine().inner().memory().read_words(addr_a, data.len())?;
        data.copy_from_slice(&out);

        let report = SortReport {
            n: data.len(),
            ticks: dev.ticks(),
            passes: dev.scheduler().passes(),
            merge_tasks: dev.engine().merge_count() as u64,
            copy_back: dev.engine().copy_back_count() > 0,
        };
        tracing::info!(
            "sorted {} words in {} ticks ({} merges, {} passes, copy-back {})",
            report.n,
            report.ticks,
            report.merge_tasks,
            report.passes,
            report.copy_back
        );
        Ok(report)
    }
}

/// Issue one register write and wait for its response.
///
/// # Errors
///
/// Decode error from the response status, or engine faults while ticking.
pub fn write_reg<E: MergeEngine>(dev: &mut SortDevice<E>, addr: u64, value: u64) -> Result<()> {
    dev.bus_mut().push_write(addr, value);
    for _ in 0..RESP_TICKS {
        dev.tick()?;
        if let Some(resp) = dev.bus_mut().pop_write_resp() {
            return resp.map_err(Into::into);
        }
    }
    Err(RiptideError::Timeout { ticks: RESP_TICKS })
}

/// Issue one register read and wait for its response.
///
/// # Errors
///
/// Decode error from the response status, or engine faults while ticking.
pub fn read_reg<E: MergeEngine>(dev: &mut SortDevice<E>, addr: u64) -> Result<u64> {
    dev.bus_mut().push_read(addr);
    for _ in 0..RESP_TICKS {
        dev.tick()?;
        if let Some(resp) = dev.bus_mut().pop_read_resp() {
            return resp.map_err(Into::into);
        }
    }
    Err(RiptideError::Timeout { ticks: RESP_TICKS })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_in_place() {
        let mut data = vec![3_u64, 1, 2];
        let report = SortExecutor::default().sort(&mut data).unwrap();
        assert_eq!(data, [1, 2, 3]);
        assert_eq!(report.n, 3);
        assert_eq!(report.passes, 2);
        assert_eq!(report.merge_tasks, 3);
        assert!(!report.copy_back);
    }

    #[test]
    fn empty_input_completes() {
        let mut data: Vec<u64> = Vec::new();
        let report = SortExecutor::default().sort(&mut data).unwrap();
        assert_eq!(report.merge_tasks, 0);
        assert!(!report.copy_back);
    }

    #[test]
    fn rejects_misaligned_buffers() {
        let cfg = SortConfig { addr_a: 0x1001, ..SortConfig::default() };
        let mut data = vec![2_u64, 1];
        let err = SortExecutor::new(cfg).sort(&mut data).unwrap_err();
        assert!(matches!(err, RiptideError::InvalidConfig { .. }));
    }

    #[test]
    fn tick_budget_trips() {
        let cfg = SortConfig { max_ticks: 4, ..SortConfig::default() };
        let mut data = vec![0_u64; 64];
        let err = SortExecutor::new(cfg).sort(&mut data).unwrap_err();
        assert!(matches!(err, RiptideError::Timeout { ticks: 4 }));
    }
}
