//! Control-state ordinals of the pass scheduler.

/// Pass-scheduler control state.
///
/// The two nested sort loops are encoded as explicit states — the outer
/// span-doubling loop through [`Step::SpanCheck`]/[`Step::NextPass`], the
/// inner per-pair loop through [`Step::PairCheck`]/[`Step::Dispatch`].
/// The scheduler commits exactly one transition per tick, so register
/// traffic can interleave between any two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Step {
    /// Waiting for the run flag.
    Idle = 0,
    /// Decide whether another pass is needed (`span < n`).
    SpanCheck = 1,
    /// Reset the pair cursor for a new pass.
    PairStart = 2,
    /// Decide whether another pair remains in this pass (`i < n`).
    PairCheck = 3,
    /// Dispatch one merge task and advance the cursor by `2·span`.
    Dispatch = 4,
    /// Swap buffer roles and double the span.
    NextPass = 5,
    /// Issue the copy-back task when the result sits in the scratch buffer.
    CopyBack = 6,
    /// Wait for the engine to drain, then clear the run flag.
    Drain = 7,
}

impl Step {
    /// Raw control-state ordinal (0–7).
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Decode a raw ordinal.
    #[must_use]
    pub const fn from_ordinal(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Idle),
            1 => Some(Self::SpanCheck),
            2 => Some(Self::PairStart),
            3 => Some(Self::PairCheck),
            4 => Some(Self::Dispatch),
            5 => Some(Self::NextPass),
            6 => Some(Self::CopyBack),
            7 => Some(Self::Drain),
            _ => None,
        }
    }
}
