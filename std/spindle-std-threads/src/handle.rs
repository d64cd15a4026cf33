//!
//! Thread Handles
//!
//! A `ThreadHandle` owns one named OS thread and the queue that feeds it.
//! The handle is created by `ThreadRegistry::register`; the registry keeps
//! only a weak reference to the shared part, so dropping the handle ends
//! the thread's life.
//!
//! The run loop, on the worker's own thread:
//!
//! 1. parks on the registry's start gate
//! 2. marks itself `Running` (unless `start_all` already did)
//! 3. pops messages in order and hands application payloads to the worker
//! 4. on the exit request marks `ExitRequested`, then `Terminated`, and returns
//!
//! A worker error is reported to the fault reporter and ends the thread.
//! A handle asked to exit while still parked on a closed gate leaves without
//! running. Application messages it had queued are dropped, and the exit
//! reports them as `ThreadError::NotStarted`.
//!

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use spindle_std_core::{assert_always, assert_true, FaultReporter};
use tracing::{debug, trace, warn};

use crate::error::ThreadError;
use crate::gate::StartGate;
use crate::message::{Message, Tag};
use crate::queue::{MessageQueue, PushError};
use crate::state::{StateCell, ThreadState};
use crate::worker::{Worker, WorkerContext};

/// The part of a thread shared between its handle, its senders, the running
/// thread and (weakly) the registry
pub(crate) struct ThreadShared<P> {
    name: String,
    state: StateCell,
    queue: MessageQueue<Message<P>>,
}

impl<P> ThreadShared<P> {
    fn new(name: String, capacity: Option<usize>) -> Self {
        Self {
            name,
            state: StateCell::new(),
            queue: MessageQueue::with_capacity(capacity),
        }
    }

    fn post(&self, tag: Tag, payload: P) -> Result<(), ThreadError> {
        let state = self.state.load();
        if state == ThreadState::Created {
            return Err(ThreadError::NotCreated {
                name: self.name.clone(),
            });
        }
        if state >= ThreadState::ExitRequested {
            return Err(ThreadError::Exited {
                name: self.name.clone(),
            });
        }
        if !tag.is_application() {
            return Err(ThreadError::ReservedTag {
                name: self.name.clone(),
                tag,
            });
        }

        match self.queue.push(Message::Application { tag, payload }) {
            Ok(()) => {
                trace!(thread = %self.name, %tag, "message posted");
                Ok(())
            }
            Err(PushError::Full(_)) => Err(ThreadError::QueueFull {
                name: self.name.clone(),
                capacity: self.queue.capacity().unwrap_or(0),
            }),
            Err(PushError::Closed(_)) => Err(ThreadError::Exited {
                name: self.name.clone(),
            }),
        }
    }
}

/// What the registry sees of a member thread
pub(crate) trait Member: Send + Sync {
    fn name(&self) -> &str;
    fn state(&self) -> ThreadState;
    fn pending(&self) -> usize;
    /// Mark a parked thread `Running` ahead of opening the gate
    fn release(&self) -> bool;
}

impl<P: Send> Member for ThreadShared<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> ThreadState {
        self.state.load()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn release(&self) -> bool {
        self.state
            .transition(ThreadState::WaitingToStart, ThreadState::Running)
    }
}

/// A cloneable posting endpoint for one thread
pub struct MessageSender<P> {
    shared: Arc<ThreadShared<P>>,
}

impl<P> Clone for MessageSender<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P> MessageSender<P> {
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Enqueue a message at the tail of the thread's queue. Never blocks.
    pub fn post(&self, tag: Tag, payload: P) -> Result<(), ThreadError> {
        self.shared.post(tag, payload)
    }
}

pub struct ThreadHandle<W: Worker> {
    shared: Arc<ThreadShared<W::Payload>>,
    worker: Option<W>,
    thread: Option<JoinHandle<Result<(), ThreadError>>>,
    gate: Arc<StartGate>,
    reporter: Arc<dyn FaultReporter>,
}

impl<W: Worker> ThreadHandle<W> {
    pub(crate) fn new(
        name: String,
        worker: W,
        capacity: Option<usize>,
        gate: Arc<StartGate>,
        reporter: Arc<dyn FaultReporter>,
    ) -> Self {
        Self {
            shared: Arc::new(ThreadShared::new(name, capacity)),
            worker: Some(worker),
            thread: None,
            gate,
            reporter,
        }
    }

    pub(crate) fn member(&self) -> Weak<dyn Member> {
        let weak: Weak<ThreadShared<W::Payload>> = Arc::downgrade(&self.shared);
        weak
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> ThreadState {
        self.shared.state.load()
    }

    /// Messages queued and not yet dispatched
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Spawn the OS thread. It parks on the start gate until `start_all`,
    /// or runs at once if the gate is already open.
    pub fn create(&mut self) -> Result<(), ThreadError> {
        let worker = self.worker.take().ok_or_else(|| ThreadError::AlreadyCreated {
            name: self.shared.name.clone(),
        })?;

        let moved = self
            .shared
            .state
            .transition(ThreadState::Created, ThreadState::WaitingToStart);
        assert_true(self.reporter.as_ref(), moved, "new thread starts in Created");

        let shared = Arc::clone(&self.shared);
        let gate = Arc::clone(&self.gate);
        let reporter = Arc::clone(&self.reporter);
        let spawned = thread::Builder::new()
            .name(self.shared.name.clone())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_loop(worker, &shared, &gate, reporter.as_ref())
                }));
                shared.queue.close();
                shared.state.advance(ThreadState::Terminated);
                debug!(thread = %shared.name, "thread terminated");
                match outcome {
                    Ok(result) => result,
                    Err(panic) => Err(ThreadError::Panicked {
                        name: shared.name.clone(),
                        message: panic_message(&*panic),
                    }),
                }
            });

        match spawned {
            Ok(handle) => {
                debug!(thread = %self.shared.name, "thread created");
                self.thread = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.state.advance(ThreadState::Terminated);
                self.shared.queue.close();
                Err(ThreadError::SpawnFailed {
                    name: self.shared.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Enqueue a message at the tail of this thread's queue. Never blocks.
    ///
    /// The payload moves into the queue; the worker receives it by value.
    pub fn post_message(&self, tag: Tag, payload: W::Payload) -> Result<(), ThreadError> {
        self.shared.post(tag, payload)
    }

    /// A posting endpoint other threads can hold
    pub fn sender(&self) -> Result<MessageSender<W::Payload>, ThreadError> {
        if self.state() == ThreadState::Created {
            return Err(ThreadError::NotCreated {
                name: self.shared.name.clone(),
            });
        }
        Ok(MessageSender {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Enqueue the exit request behind everything already posted, then join.
    ///
    /// Returns once the thread is `Terminated`, with the run loop's outcome.
    /// Blocks for as long as the worker takes to drain its queue. Calling it
    /// again after the thread has exited does nothing.
    pub fn request_exit(&mut self) -> Result<(), ThreadError> {
        let Some(thread) = self.thread.take() else {
            if self.state() == ThreadState::Created {
                return Err(ThreadError::NotCreated {
                    name: self.shared.name.clone(),
                });
            }
            debug!(thread = %self.shared.name, "exit already requested");
            return Ok(());
        };

        self.shared.queue.close_with(Message::ExitRequest);
        self.gate.nudge();
        debug!(thread = %self.shared.name, "exit requested");

        match thread.join() {
            Ok(result) => result,
            Err(panic) => Err(ThreadError::Panicked {
                name: self.shared.name.clone(),
                message: panic_message(&*panic),
            }),
        }
    }
}

impl<W: Worker> Drop for ThreadHandle<W> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(e) = self.request_exit() {
                warn!(thread = %self.shared.name, "thread ended with error: {}", e);
            }
        }
    }
}

fn run_loop<W: Worker>(
    mut worker: W,
    shared: &ThreadShared<W::Payload>,
    gate: &StartGate,
    reporter: &dyn FaultReporter,
) -> Result<(), ThreadError> {
    if !gate.wait_or(|| shared.queue.is_closed()) {
        shared.state.advance(ThreadState::ExitRequested);
        let dropped = shared
            .queue
            .drain()
            .into_iter()
            .filter(|message| matches!(message, Message::Application { .. }))
            .count();
        debug!(thread = %shared.name, dropped, "exit requested before start");
        if dropped > 0 {
            return Err(ThreadError::NotStarted {
                name: shared.name.clone(),
                dropped,
            });
        }
        return Ok(());
    }
    shared
        .state
        .transition(ThreadState::WaitingToStart, ThreadState::Running);
    debug!(thread = %shared.name, "thread running");

    let cx = WorkerContext::new(&shared.name);
    worker.on_start(&cx);

    loop {
        match shared.queue.pop() {
            Some(Message::Application { tag, payload }) => {
                trace!(thread = %shared.name, %tag, "dispatching message");
                if let Err(e) = worker.process(&cx, tag, payload) {
                    assert_always(reporter, &e.to_string());
                    return Err(e);
                }
            }
            Some(Message::ExitRequest) => {
                shared.state.advance(ThreadState::ExitRequested);
                worker.on_exit(&cx);
                return Ok(());
            }
            None => {
                assert_always(reporter, "message queue closed without an exit request");
                return Ok(());
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
