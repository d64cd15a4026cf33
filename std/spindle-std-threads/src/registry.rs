//!
//! Thread Registry
//!
//! The registry is the coordinator's view of a group of threads. It hands
//! out `ThreadHandle`s, remembers each one weakly, and owns the start gate
//! they all park on.
//!
//! `start_all` marks every parked member `Running` and then opens the gate,
//! all under the member lock, so no member observes a partial release.
//! Members created after the gate opened start running immediately.
//!

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use spindle_std_core::{AbortReporter, FaultReporter};
use tracing::debug;

use crate::gate::StartGate;
use crate::handle::{Member, ThreadHandle};
use crate::state::ThreadState;
use crate::worker::Worker;

/// A point-in-time view of one registered thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub name: String,
    pub state: ThreadState,
    pub pending: usize,
}

pub struct ThreadRegistry {
    members: Mutex<Vec<Weak<dyn Member>>>,
    gate: Arc<StartGate>,
    reporter: Arc<dyn FaultReporter>,
    queue_capacity: Option<usize>,
}

impl ThreadRegistry {
    /// A registry whose faults abort the process
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(AbortReporter))
    }

    pub fn with_reporter(reporter: Arc<dyn FaultReporter>) -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            gate: Arc::new(StartGate::new()),
            reporter,
            queue_capacity: None,
        }
    }

    /// Bound the queue of every thread registered from now on
    pub fn with_queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue_capacity = capacity;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Weak<dyn Member>>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reporter(&self) -> Arc<dyn FaultReporter> {
        Arc::clone(&self.reporter)
    }

    /// Build a handle for `worker` and remember it. The caller owns the handle.
    ///
    /// Entries of dropped handles are forgotten on the way in.
    pub fn register<W: Worker>(&self, name: impl Into<String>, worker: W) -> ThreadHandle<W> {
        let handle = ThreadHandle::new(
            name.into(),
            worker,
            self.queue_capacity,
            Arc::clone(&self.gate),
            Arc::clone(&self.reporter),
        );
        let mut members = self.lock();
        members.retain(|member| member.strong_count() > 0);
        members.push(handle.member());
        drop(members);
        debug!(thread = handle.name(), "thread registered");
        handle
    }

    /// Release every parked member at once. Returns how many this call
    /// released; later calls release nothing and return 0.
    pub fn start_all(&self) -> usize {
        let members = self.lock();
        if self.gate.is_open() {
            return 0;
        }

        let released = members
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|member| member.release())
            .count();
        self.gate.open();
        debug!(released, "start gate opened");
        released
    }

    pub fn is_started(&self) -> bool {
        self.gate.is_open()
    }

    /// Registered entries, including handles dropped since the last
    /// `register` or `prune`
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|member| member.strong_count() > 0)
            .count()
    }

    /// Live members in registration order
    pub fn snapshot(&self) -> Vec<ThreadInfo> {
        self.lock()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|member| ThreadInfo {
                name: member.name().to_string(),
                state: member.state(),
                pending: member.pending(),
            })
            .collect()
    }

    pub fn state_of(&self, name: &str) -> Option<ThreadState> {
        self.lock()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|member| member.name() == name)
            .map(|member| member.state())
    }

    /// Forget dropped handles. Returns how many entries were removed.
    pub fn prune(&self) -> usize {
        let mut members = self.lock();
        let before = members.len();
        members.retain(|member| member.strong_count() > 0);
        before - members.len()
    }
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThreadError;
    use crate::message::Tag;
    use crate::worker::{worker_fn, WorkerContext};
    use spindle_std_core::RecordingReporter;

    fn quiet_worker() -> impl Worker<Payload = ()> {
        worker_fn(|_cx: &WorkerContext<'_>, _tag: Tag, _payload: ()| Ok::<(), ThreadError>(()))
    }

    fn recording_registry() -> ThreadRegistry {
        ThreadRegistry::with_reporter(Arc::new(RecordingReporter::new()))
    }

    #[test]
    fn test_register_keeps_order_and_weak_refs() {
        let registry = recording_registry();
        let a = registry.register("A", quiet_worker());
        let b = registry.register("B", quiet_worker());

        let names: Vec<_> = registry.snapshot().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(registry.live_count(), 2);

        drop(a);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.prune(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(b.name(), "B");
    }

    #[test]
    fn test_register_forgets_dropped_handles() {
        let registry = recording_registry();
        for i in 0..10 {
            let handle = registry.register(format!("short-{}", i), quiet_worker());
            drop(handle);
        }
        let keep = registry.register("kept", quiet_worker());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.prune(), 0);
        assert_eq!(keep.name(), "kept");
    }

    #[test]
    fn test_start_all_releases_created_members_once() {
        let registry = recording_registry();
        let mut a = registry.register("A", quiet_worker());
        let mut b = registry.register("B", quiet_worker());
        let c = registry.register("C", quiet_worker());
        a.create().unwrap();
        b.create().unwrap();

        assert_eq!(registry.state_of("A"), Some(ThreadState::WaitingToStart));
        assert_eq!(registry.state_of("C"), Some(ThreadState::Created));

        assert_eq!(registry.start_all(), 2);
        assert!(registry.is_started());
        assert_eq!(a.state(), ThreadState::Running);
        assert_eq!(b.state(), ThreadState::Running);
        assert_eq!(c.state(), ThreadState::Created);

        assert_eq!(registry.start_all(), 0);

        a.request_exit().unwrap();
        b.request_exit().unwrap();
    }

    #[test]
    fn test_unknown_name_has_no_state() {
        let registry = recording_registry();
        assert!(registry.is_empty());
        assert_eq!(registry.state_of("missing"), None);
        assert_eq!(registry.start_all(), 0);
    }
}
