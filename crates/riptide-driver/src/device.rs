//! Device top: CSR bank, bus endpoint, pass scheduler, and engine wiring.

use riptide_chip::Step;

use crate::bus::BusTransactor;
use crate::csr::CsrBank;
use crate::engine::{MasterId, MergeEngine};
use crate::error::Result;
use crate::sched::PassScheduler;

/// The RT64 sort controller with its engine.
///
/// One [`tick`](Self::tick) is a synchronous scheduling tick: at most one
/// pending write request, one pending read request, one scheduler
/// transition, and one engine execution step all commit within it. The
/// only field shared between those paths is the run flag — the write path
/// sets it, the scheduler's drain state clears it.
#[derive(Debug)]
pub struct SortDevice<E> {
    id: u32,
    csr: CsrBank,
    bus: BusTransactor,
    sched: PassScheduler,
    engine: E,
    limit: u64,
    ticks: u64,
}

impl<E: MergeEngine> SortDevice<E> {
    /// Device wired to `engine`. Call [`init`](Self::init) before use.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            id: 0,
            csr: CsrBank::new(0),
            bus: BusTransactor::new(),
            sched: PassScheduler::new(),
            engine,
            limit: 0,
            ticks: 0,
        }
    }

    /// Reset the controller and rebase the CSR window.
    ///
    /// `limit` is accepted and stored but no decode or scheduling rule
    /// consults it.
    pub fn init(&mut self, id: u32, base: u64, limit: u64) {
        self.id = id;
        self.csr.reset(base);
        self.sched.reset();
        self.bus.reset();
        self.engine.reset();
        self.limit = limit;
        self.ticks = 0;
        tracing::debug!("device {id} init: csr window {base:#x}, limit {limit:#x}");
    }

    /// Advance the model by one scheduling tick.
    ///
    /// # Errors
    ///
    /// Propagates engine-internal faults; the control plane itself never
    /// fails a tick.
    pub fn tick(&mut self) -> Result<()> {
        self.ticks += 1;
        if let Some(req) = self.bus.take_write() {
            let resp = self.csr.handle_write(req.addr, req.data);
            self.bus.complete_write(resp);
        }
        if let Some(req) = self.bus.take_read() {
            let resp = self.csr.handle_read(req.addr);
            self.bus.complete_read(resp);
        }
        self.sched.tick(&mut self.csr, &mut self.engine);
        self.engine.tick()
    }

    /// Interrupt line: permanently deasserted. Completion is polled via the
    /// run flag.
    #[must_use]
    pub const fn irq(&self) -> bool {
        false
    }

    /// Upstream memory-master identity — a passthrough of the engine's.
    #[must_use]
    pub fn master_id(&self) -> MasterId {
        self.engine.master_id()
    }

    /// Device identifier given at init.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Limit address given at init (stored, unused by decode).
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Ticks since init.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current scheduler control state.
    #[must_use]
    pub fn step(&self) -> Step {
        self.sched.step()
    }

    /// The register bank (host-visible state).
    #[must_use]
    pub fn csr(&self) -> &CsrBank {
        &self.csr
    }

    /// The scheduler, for run statistics.
    #[must_use]
    pub fn scheduler(&self) -> &PassScheduler {
        &self.sched
    }

    /// The bus endpoint.
    #[must_use]
    pub fn bus(&self) -> &BusTransactor {
        &self.bus
    }

    /// Mutable bus endpoint, for enqueueing host requests.
    pub fn bus_mut(&mut self) -> &mut BusTransactor {
        &mut self.bus
    }

    /// The attached engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the attached engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::SoftwareEngine;
    use crate::mem::Memory;
    use riptide_chip::regs;

    fn device() -> SortDevice<SoftwareEngine> {
        let engine = SoftwareEngine::new(Memory::new(0x1000, 16))
            .with_master_id(MasterId::new(3));
        let mut dev = SortDevice::new(engine);
        dev.init(0, 0x9000_0000, 0x9000_1000);
        dev
    }

    #[test]
    fn irq_stays_deasserted() {
        let mut dev = device();
        assert!(!dev.irq());
        dev.bus_mut().push_write(0x9000_0000 + regs::COUNT, 0);
        dev.tick().unwrap();
        assert!(!dev.irq());
    }

    #[test]
    fn master_id_is_engine_passthrough() {
        let dev = device();
        assert_eq!(dev.master_id(), MasterId::new(3));
    }

    #[test]
    fn init_resets_everything() {
        let mut dev = device();
        dev.bus_mut().push_write(0x9000_0000 + regs::RUN, 1);
        dev.tick().unwrap();
        dev.init(1, 0x4000, 0x5000);
        assert_eq!(dev.step(), Step::Idle);
        assert_eq!(dev.csr().run(), 0);
        assert_eq!(dev.csr().base(), 0x4000);
        assert_eq!(dev.id(), 1);
        assert_eq!(dev.limit(), 0x5000);
        assert_eq!(dev.ticks(), 0);
    }

    #[test]
    fn one_request_per_channel_per_tick() {
        let mut dev = device();
        let base = 0x9000_0000;
        dev.bus_mut().push_write(base + regs::COUNT, 4);
        dev.bus_mut().push_write(base + regs::ADDR_A, 0x1000);
        dev.tick().unwrap();
        assert_eq!(dev.bus().pending_writes(), 1);
        assert_eq!(dev.csr().count(), 4);
        assert_eq!(dev.csr().addr_a(), 0);
        dev.tick().unwrap();
        assert_eq!(dev.bus().pending_writes(), 0);
        assert_eq!(dev.csr().addr_a(), 0x1000);
    }
}
