//! Frame phases and their fixed ordering.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// One step of the per-frame dispatch cycle.
///
/// Phases always run `BeginFrame -> Update -> Render -> EndFrame`, then wrap
/// back to `BeginFrame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    BeginFrame,
    Update,
    Render,
    EndFrame,
}

impl FramePhase {
    pub const ALL: [FramePhase; 4] = [
        FramePhase::BeginFrame,
        FramePhase::Update,
        FramePhase::Render,
        FramePhase::EndFrame,
    ];

    /// The phase that must follow this one.
    pub const fn next(self) -> Self {
        match self {
            FramePhase::BeginFrame => FramePhase::Update,
            FramePhase::Update => FramePhase::Render,
            FramePhase::Render => FramePhase::EndFrame,
            FramePhase::EndFrame => FramePhase::BeginFrame,
        }
    }

    /// Validate moving from `previous` (the last phase that ran, if any) to `self`.
    ///
    /// The first phase after start-up is always accepted.
    pub fn check_transition(self, previous: Option<FramePhase>) -> Result<(), PhaseError> {
        match previous {
            None => Ok(()),
            Some(prev) if prev.next() == self => Ok(()),
            Some(prev) => Err(PhaseError::OutOfOrder {
                expected: prev.next(),
                found: self,
            }),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FramePhase::BeginFrame => "begin_frame",
            FramePhase::Update => "update",
            FramePhase::Render => "render",
            FramePhase::EndFrame => "end_frame",
        }
    }
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remembers the last phase that ran.
///
/// Atomic so the read-only render pass can record itself through `&self`.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    // 0 = nothing ran since reset, otherwise `FramePhase` index + 1.
    last: AtomicU8,
}

impl PhaseTracker {
    pub const fn new() -> Self {
        Self {
            last: AtomicU8::new(0),
        }
    }

    pub fn last(&self) -> Option<FramePhase> {
        match self.last.load(Ordering::Relaxed) {
            0 => None,
            n => FramePhase::ALL.get(n as usize - 1).copied(),
        }
    }

    /// Record `phase` as running and report whether it was the one due.
    ///
    /// The phase is recorded either way, so a single stray call produces a
    /// single error instead of poisoning every later transition.
    pub fn enter(&self, phase: FramePhase) -> Result<(), PhaseError> {
        let encoded = phase as u8 + 1;
        let previous = match self.last.swap(encoded, Ordering::Relaxed) {
            0 => None,
            n => FramePhase::ALL.get(n as usize - 1).copied(),
        };
        phase.check_transition(previous)
    }

    pub fn reset(&self) {
        self.last.store(0, Ordering::Relaxed);
    }
}

/// Errors describing a broken frame cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseError {
    /// A phase ran when a different one was due.
    OutOfOrder {
        /// The phase that should have run.
        expected: FramePhase,
        /// The phase that actually ran.
        found: FramePhase,
    },
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseError::OutOfOrder { expected, found } => {
                write!(f, "frame phase out of order: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for PhaseError {}
