//! Software merge engine.
//!
//! Executes dispatched tasks against a modelled memory with the ordering
//! the hardware engine produces: stable two-way merges of 64-bit words,
//! both source runs clipped at `n`. The copy-back task (`span == n`)
//! degenerates to a straight copy because its right run clips to empty —
//! the same datapath handles both.

use std::collections::VecDeque;

use riptide_chip::MergeTask;

use crate::engine::{MasterId, MergeEngine};
use crate::error::Result;
use crate::mem::Memory;

/// CPU-side engine model.
///
/// Accepted tasks queue internally; each tick retires up to `width` of
/// them. Width 1 models a fully serial engine, larger widths model the
/// hardware retiring several merges per cycle.
#[derive(Debug)]
pub struct SoftwareEngine {
    mem: Memory,
    pending: VecDeque<MergeTask>,
    width: usize,
    master: MasterId,
    executed: u64,
}

impl SoftwareEngine {
    /// Engine mastering the given memory window, retiring one task per tick.
    #[must_use]
    pub fn new(mem: Memory) -> Self {
        Self {
            mem,
            pending: VecDeque::new(),
            width: 1,
            master: MasterId::new(0),
            executed: 0,
        }
    }

    /// Set the number of tasks retired per tick (minimum 1).
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Set the engine's bus-mastering identity.
    #[must_use]
    pub fn with_master_id(mut self, master: MasterId) -> Self {
        self.master = master;
        self
    }

    /// The memory window this engine masters.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Mutable access to the memory window, for host-side data staging.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.mem
    }

    /// Tasks executed since the last reset.
    #[must_use]
    pub fn executed(&self) -> u64 {
        self.executed
    }

    fn execute(&mut self, task: &MergeTask) -> Result<()> {
        let (l_lo, l_hi) = task.left();
        let (r_lo, r_hi) = task.right();
        let left = self.mem.read_words(task.src + l_lo * 8, (l_hi - l_lo) as usize)?;
        let right = self.mem.read_words(task.src + r_lo * 8, (r_hi - r_lo) as usize)?;

        let mut out = Vec::with_capacity(left.len() + right.len());
        let (mut a, mut b) = (0, 0);
        while a < left.len() && b < right.len() {
            // `<=` keeps the merge stable.
            if left[a] <= right[b] {
                out.push(left[a]);
                a += 1;
            } else {
                out.push(right[b]);
                b += 1;
            }
        }
        out.extend_from_slice(&left[a..]);
        out.extend_from_slice(&right[b..]);

        self.mem.store_words(task.dst + l_lo * 8, &out)
    }
}

impl MergeEngine for SoftwareEngine {
    fn start(&mut self, task: MergeTask) {
        tracing::trace!(
            "engine accept tag {} i {} span {} n {}",
            task.tag,
            task.i,
            task.span,
            task.n
        );
        self.pending.push_back(task);
    }

    fn done(&self) -> bool {
        self.pending.is_empty()
    }

    fn tick(&mut self) -> Result<()> {
        for _ in 0..self.width {
            let Some(task) = self.pending.pop_front() else {
                break;
            };
            self.execute(&task)?;
            self.executed += 1;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.executed = 0;
    }

    fn master_id(&self) -> MasterId {
        self.master
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(addr: u64, data: &[u64], scratch: usize) -> SoftwareEngine {
        let mut mem = Memory::new(addr, data.len() + scratch);
        mem.store_words(addr, data).unwrap();
        SoftwareEngine::new(mem)
    }

    fn drain(engine: &mut SoftwareEngine) {
        while !engine.done() {
            engine.tick().unwrap();
        }
    }

    #[test]
    fn merges_two_runs() {
        // src: [1,3 | 2,4] at 0x0, dst at 0x20
        let mut engine = engine_with(0, &[1, 3, 2, 4], 4);
        engine.start(MergeTask { tag: 0, i: 0, span: 2, src: 0, dst: 0x20, n: 4 });
        drain(&mut engine);
        assert_eq!(engine.memory().read_words(0x20, 4).unwrap(), [1, 2, 3, 4]);
        assert_eq!(engine.executed(), 1);
    }

    #[test]
    fn clips_right_run_at_n() {
        // n = 3: right run is the single element [2].
        let mut engine = engine_with(0, &[1, 5, 2], 3);
        engine.start(MergeTask { tag: 0, i: 0, span: 2, src: 0, dst: 0x18, n: 3 });
        drain(&mut engine);
        assert_eq!(engine.memory().read_words(0x18, 3).unwrap(), [1, 2, 5]);
    }

    #[test]
    fn copy_back_is_a_straight_copy() {
        let mut engine = engine_with(0, &[9, 8, 7, 6], 4);
        engine.start(MergeTask { tag: 0, i: 0, span: 4, src: 0, dst: 0x20, n: 4 });
        drain(&mut engine);
        assert_eq!(engine.memory().read_words(0x20, 4).unwrap(), [9, 8, 7, 6]);
    }

    #[test]
    fn width_bounds_tasks_per_tick() {
        let mut engine = engine_with(0, &[2, 1, 4, 3], 4).with_width(2);
        engine.start(MergeTask { tag: 0, i: 0, span: 1, src: 0, dst: 0x20, n: 4 });
        engine.start(MergeTask { tag: 1, i: 2, span: 1, src: 0, dst: 0x20, n: 4 });
        engine.start(MergeTask { tag: 2, i: 0, span: 2, src: 0x20, dst: 0, n: 4 });
        assert!(!engine.done());
        engine.tick().unwrap();
        assert_eq!(engine.executed(), 2);
        assert!(!engine.done());
        engine.tick().unwrap();
        assert!(engine.done());
        assert_eq!(engine.memory().read_words(0, 4).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn unmapped_task_faults() {
        let mut engine = engine_with(0x1000, &[1, 2], 2);
        engine.start(MergeTask { tag: 0, i: 0, span: 1, src: 0x8000, dst: 0x1010, n: 2 });
        assert!(engine.tick().is_err());
    }

    #[test]
    fn reset_discards_queue() {
        let mut engine = engine_with(0, &[1, 2], 2);
        engine.start(MergeTask { tag: 0, i: 0, span: 1, src: 0, dst: 0x10, n: 2 });
        engine.reset();
        assert!(engine.done());
        assert_eq!(engine.executed(), 0);
    }
}
