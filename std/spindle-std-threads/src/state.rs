///
/// Thread Lifecycle State
///
/// States only move forward. `StateCell` stores the state in an atomic so
/// the coordinating thread and the worker thread see each other's writes
/// (release on store, acquire on load).
///

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThreadState {
    Created = 0,
    WaitingToStart = 1,
    Running = 2,
    ExitRequested = 3,
    Terminated = 4,
}

impl ThreadState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ThreadState::Created,
            1 => ThreadState::WaitingToStart,
            2 => ThreadState::Running,
            3 => ThreadState::ExitRequested,
            _ => ThreadState::Terminated,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThreadState::Created => "created",
            ThreadState::WaitingToStart => "waiting-to-start",
            ThreadState::Running => "running",
            ThreadState::ExitRequested => "exit-requested",
            ThreadState::Terminated => "terminated",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ThreadState::Terminated
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(ThreadState::Created as u8))
    }

    pub fn load(&self) -> ThreadState {
        ThreadState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from exactly `from` to `to`. Fails if another transition won.
    pub fn transition(&self, from: ThreadState, to: ThreadState) -> bool {
        debug_assert!(to > from, "state transitions are monotonic");
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Move forward to `to` from any earlier state; later states are kept.
    /// Returns the previous state.
    pub fn advance(&self, to: ThreadState) -> ThreadState {
        ThreadState::from_u8(self.0.fetch_max(to as u8, Ordering::AcqRel))
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
