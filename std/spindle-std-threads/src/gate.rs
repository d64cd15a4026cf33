///
/// Start Gate
///
/// A single-use gate shared by every thread of a registry. Threads park in
/// `wait_or` until the gate opens; opening wakes all of them in one step and
/// cannot be undone. A parked thread can also be nudged out without opening
/// the gate when its own abandon condition becomes true.
///

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct StartGate {
    open: Mutex<bool>,
    changed: Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the gate. Returns true only for the call that opened it.
    pub fn open(&self) -> bool {
        let mut open = self.lock();
        if *open {
            return false;
        }
        *open = true;
        self.changed.notify_all();
        true
    }

    pub fn is_open(&self) -> bool {
        *self.lock()
    }

    /// Block until the gate opens
    pub fn wait(&self) {
        self.wait_or(|| false);
    }

    /// Block until the gate opens (returns true) or `abandon` holds while the
    /// gate is still closed (returns false). `abandon` is re-checked after
    /// every `nudge`.
    pub fn wait_or(&self, abandon: impl Fn() -> bool) -> bool {
        let mut open = self.lock();
        loop {
            if *open {
                return true;
            }
            if abandon() {
                return false;
            }
            open = self
                .changed
                .wait(open)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wake parked threads so they re-check their abandon condition
    pub fn nudge(&self) {
        let _open = self.lock();
        self.changed.notify_all();
    }
}
