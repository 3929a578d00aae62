//! Task-recording engine decorator.
//!
//! Wraps any [`MergeEngine`] and remembers every task the scheduler
//! dispatched, in dispatch order. Used by the test harness to check task
//! sequences and by the CLI/bench layers for run statistics; the wrapped
//! engine sees exactly the traffic it would see unwrapped.

use riptide_chip::MergeTask;

use crate::engine::{MasterId, MergeEngine};
use crate::error::Result;

/// Recording decorator over an inner engine.
#[derive(Debug)]
pub struct RecordingEngine<E> {
    inner: E,
    started: Vec<MergeTask>,
}

impl<E> RecordingEngine<E> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: E) -> Self {
        Self { inner, started: Vec::new() }
    }

    /// The wrapped engine.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Mutable access to the wrapped engine.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    /// Every task dispatched since the last reset, in dispatch order.
    pub fn tasks(&self) -> &[MergeTask] {
        &self.started
    }

    /// Dispatched merge tasks (copy-back excluded).
    pub fn merge_count(&self) -> usize {
        self.started.iter().filter(|t| !t.is_copy_back()).count()
    }

    /// Dispatched copy-back tasks (0 or 1 per run).
    pub fn copy_back_count(&self) -> usize {
        self.started.iter().filter(|t| t.is_copy_back()).count()
    }
}

impl<E: MergeEngine> MergeEngine for RecordingEngine<E> {
    fn start(&mut self, task: MergeTask) {
        self.started.push(task);
        self.inner.start(task);
    }

    fn done(&self) -> bool {
        self.inner.done()
    }

    fn tick(&mut self) -> Result<()> {
        self.inner.tick()
    }

    fn reset(&mut self) {
        self.started.clear();
        self.inner.reset();
    }

    fn master_id(&self) -> MasterId {
        self.inner.master_id()
    }
}
