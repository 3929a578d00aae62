//! Pass scheduler: the two nested sort loops as an explicit state machine.
//!
//! The scheduler commits exactly one transition per tick. Keeping the loops
//! as states (rather than native `for` loops) preserves the interleaving
//! with concurrent register traffic — a CSR access can land between any two
//! transitions, and the run flag stays observable at every step.
//!
//! Transition table (guard → effect → next):
//!
//! ```text
//! Idle       run ≠ 0    span := 1, src := addr_A, dst := addr_B     SpanCheck
//! SpanCheck  —          span < n ?                                  PairStart | CopyBack
//! PairStart  —          i := 0                                      PairCheck
//! PairCheck  —          i < n ?                                     Dispatch | NextPass
//! Dispatch   —          start task(i, span, src, dst, n); i += 2·span   PairCheck
//! NextPass   —          swap(src, dst); span *= 2                   SpanCheck
//! CopyBack   —          src == addr_B ? start task(0, n, src, dst, n)   Drain
//! Drain      done       run := 0                                    Idle
//! ```

use riptide_chip::{MergeTask, Step};

use crate::csr::CsrBank;
use crate::engine::MergeEngine;

/// The controller's pass/merge sequencing state machine.
#[derive(Debug)]
pub struct PassScheduler {
    step: Step,
    span: u64,
    src: u64,
    dst: u64,
    cursor: u64,
    next_tag: u32,
    passes: u32,
    dispatched: u64,
}

impl PassScheduler {
    /// Scheduler in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: Step::Idle,
            span: 0,
            src: 0,
            dst: 0,
            cursor: 0,
            next_tag: 0,
            passes: 0,
            dispatched: 0,
        }
    }

    /// Return to the idle state, discarding any in-flight run.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current control state.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Passes started during the current or last run.
    #[must_use]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Tasks dispatched during the current or last run, copy-back included.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Commit one guarded transition.
    ///
    /// Guards are pure predicates over current state; a tick whose guard
    /// does not hold (idle without the run flag, drain without `done`)
    /// leaves the state unchanged.
    pub fn tick<E: MergeEngine>(&mut self, csr: &mut CsrBank, engine: &mut E) {
        self.step = match self.step {
            Step::Idle => {
                if csr.run() == 0 {
                    Step::Idle
                } else {
                    self.span = 1;
                    self.src = csr.addr_a();
                    self.dst = csr.addr_b();
                    self.next_tag = 0;
                    self.passes = 0;
                    self.dispatched = 0;
                    tracing::debug!(
                        "run start: addr_a={:#x} addr_b={:#x} n={}",
                        self.src,
                        self.dst,
                        csr.count()
                    );
                    Step::SpanCheck
                }
            }

            Step::SpanCheck => {
                if self.span < csr.count() {
                    Step::PairStart
                } else {
                    Step::CopyBack
                }
            }

            Step::PairStart => {
                self.cursor = 0;
                self.passes += 1;
                tracing::trace!("pass {} span {}", self.passes, self.span);
                Step::PairCheck
            }

            Step::PairCheck => {
                if self.cursor < csr.count() {
                    Step::Dispatch
                } else {
                    Step::NextPass
                }
            }

            Step::Dispatch => {
                let task = MergeTask {
                    tag: self.next_tag,
                    i: self.cursor,
                    span: self.span,
                    src: self.src,
                    dst: self.dst,
                    n: csr.count(),
                };
                tracing::trace!(
                    "dispatch tag {} i {} span {}",
                    task.tag,
                    task.i,
                    task.span
                );
                engine.start(task);
                self.next_tag += 1;
                self.dispatched += 1;
                self.cursor += 2 * self.span;
                Step::PairCheck
            }

            Step::NextPass => {
                std::mem::swap(&mut self.src, &mut self.dst);
                self.span *= 2;
                Step::SpanCheck
            }

            Step::CopyBack => {
                // The result alternates buffers each pass; copy it home only
                // when it ended up in the scratch buffer.
                if self.src == csr.addr_b() {
                    let n = csr.count();
                    let task = MergeTask {
                        tag: self.next_tag,
                        i: 0,
                        span: n,
                        src: self.src,
                        dst: self.dst,
                        n,
                    };
                    tracing::debug!("copy-back {:#x} -> {:#x} ({n} words)", self.src, self.dst);
                    engine.start(task);
                    self.next_tag += 1;
                    self.dispatched += 1;
                }
                Step::Drain
            }

            Step::Drain => {
                if engine.done() {
                    csr.clear_run();
                    tracing::debug!(
                        "run complete: {} tasks over {} passes",
                        self.dispatched,
                        self.passes
                    );
                    Step::Idle
                } else {
                    Step::Drain
                }
            }
        };
    }
}

impl Default for PassScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riptide_chip::regs;

    /// Accepts everything, completes instantly, remembers what it saw.
    #[derive(Debug, Default)]
    struct SinkEngine {
        tasks: Vec<MergeTask>,
    }

    impl MergeEngine for SinkEngine {
        fn start(&mut self, task: MergeTask) {
            self.tasks.push(task);
        }
        fn done(&self) -> bool {
            true
        }
        fn tick(&mut self) -> crate::error::Result<()> {
            Ok(())
        }
        fn reset(&mut self) {
            self.tasks.clear();
        }
        fn master_id(&self) -> crate::engine::MasterId {
            crate::engine::MasterId::new(0)
        }
    }

    const BASE: u64 = 0x9000_0000;

    fn start_run(n: u64) -> (CsrBank, SinkEngine, PassScheduler) {
        let mut csr = CsrBank::new(BASE);
        csr.handle_write(BASE + regs::ADDR_A, 0x1000).unwrap();
        csr.handle_write(BASE + regs::ADDR_B, 0x2000).unwrap();
        csr.handle_write(BASE + regs::COUNT, n).unwrap();
        csr.handle_write(BASE + regs::RUN, regs::run::START).unwrap();
        (csr, SinkEngine::default(), PassScheduler::new())
    }

    fn run_to_idle(csr: &mut CsrBank, engine: &mut SinkEngine, sched: &mut PassScheduler) -> u64 {
        let mut ticks = 0;
        loop {
            sched.tick(csr, engine);
            ticks += 1;
            if sched.step() == Step::Idle {
                return ticks;
            }
            assert!(ticks < 100_000, "scheduler did not terminate");
        }
    }

    #[test]
    fn idle_without_run_flag() {
        let mut csr = CsrBank::new(BASE);
        let mut engine = SinkEngine::default();
        let mut sched = PassScheduler::new();
        for _ in 0..10 {
            sched.tick(&mut csr, &mut engine);
            assert_eq!(sched.step(), Step::Idle);
        }
        assert!(engine.tasks.is_empty());
    }

    #[test]
    fn trivial_counts_dispatch_nothing() {
        for n in [0, 1] {
            let (mut csr, mut engine, mut sched) = start_run(n);
            let ticks = run_to_idle(&mut csr, &mut engine, &mut sched);
            assert!(engine.tasks.is_empty(), "n={n} dispatched tasks");
            assert_eq!(csr.run(), 0, "n={n} left run set");
            assert!(ticks <= 8, "n={n} took {ticks} ticks");
        }
    }

    #[test]
    fn n8_dispatches_seven_merges_and_copy_back() {
        let (mut csr, mut engine, mut sched) = start_run(8);
        run_to_idle(&mut csr, &mut engine, &mut sched);

        let merges: Vec<_> = engine.tasks.iter().filter(|t| !t.is_copy_back()).collect();
        assert_eq!(merges.len(), 7);
        let spans: Vec<u64> = merges.iter().map(|t| t.span).collect();
        assert_eq!(spans, [1, 1, 1, 1, 2, 2, 4]);

        let copy_backs: Vec<_> = engine.tasks.iter().filter(|t| t.is_copy_back()).collect();
        assert_eq!(copy_backs.len(), 1);
        // Three passes are odd, so the result sits in B and copies home to A.
        assert_eq!(copy_backs[0].src, 0x2000);
        assert_eq!(copy_backs[0].dst, 0x1000);
        assert_eq!(sched.dispatched(), 8);
        assert_eq!(sched.passes(), 3);
    }

    #[test]
    fn n4_has_no_copy_back() {
        let (mut csr, mut engine, mut sched) = start_run(4);
        run_to_idle(&mut csr, &mut engine, &mut sched);
        assert_eq!(engine.tasks.len(), 3);
        assert!(engine.tasks.iter().all(|t| !t.is_copy_back()));
    }

    #[test]
    fn tags_are_sequential_and_reset_per_run() {
        let (mut csr, mut engine, mut sched) = start_run(8);
        run_to_idle(&mut csr, &mut engine, &mut sched);
        let tags: Vec<u32> = engine.tasks.iter().map(|t| t.tag).collect();
        assert_eq!(tags, (0..8).collect::<Vec<_>>());

        engine.reset();
        csr.handle_write(BASE + regs::RUN, regs::run::START).unwrap();
        run_to_idle(&mut csr, &mut engine, &mut sched);
        assert_eq!(engine.tasks[0].tag, 0);
    }

    #[test]
    fn cursor_advances_by_two_spans() {
        let (mut csr, mut engine, mut sched) = start_run(8);
        run_to_idle(&mut csr, &mut engine, &mut sched);
        let pass1: Vec<u64> = engine
            .tasks
            .iter()
            .filter(|t| t.span == 1)
            .map(|t| t.i)
            .collect();
        assert_eq!(pass1, [0, 2, 4, 6]);
        let pass2: Vec<u64> = engine
            .tasks
            .iter()
            .filter(|t| t.span == 2)
            .map(|t| t.i)
            .collect();
        assert_eq!(pass2, [0, 4]);
    }
}
