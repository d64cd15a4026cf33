///
/// Worker Behaviour
///
/// A `Worker` supplies what a thread does with each application message.
/// It owns no queue logic: the handle's run loop pops messages and calls
/// `process` once per message, in posting order, on the worker's own thread.
///
/// `process` receives the payload by value and is responsible for it from
/// then on. It must not block indefinitely (the exit request sits behind it
/// in the same queue) and must not synchronously exit its own handle.
///

use std::fmt;
use std::marker::PhantomData;

use crate::error::ThreadError;
use crate::message::Tag;

/// What the run loop tells a worker about the thread it runs on
#[derive(Debug, Clone, Copy)]
pub struct WorkerContext<'a> {
    name: &'a str,
}

impl<'a> WorkerContext<'a> {
    pub(crate) fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The error a worker returns for a tag it does not handle
    pub fn unexpected_tag(&self, tag: Tag) -> ThreadError {
        ThreadError::unexpected_tag(self.name, tag)
    }
}

pub trait Worker: Send + 'static {
    type Payload: Send + 'static;

    /// Handle one application message. An error is a contract violation:
    /// it is reported as a fault and the thread terminates.
    fn process(
        &mut self,
        cx: &WorkerContext<'_>,
        tag: Tag,
        payload: Self::Payload,
    ) -> Result<(), ThreadError>;

    /// Called once after the start gate opens, before the first message
    fn on_start(&mut self, _cx: &WorkerContext<'_>) {}

    /// Called once after the exit request is dequeued
    fn on_exit(&mut self, _cx: &WorkerContext<'_>) {}
}

/// A worker built from a closure
pub struct FnWorker<P, F> {
    func: F,
    _payload: PhantomData<fn(P)>,
}

impl<P, F> fmt::Debug for FnWorker<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnWorker").finish_non_exhaustive()
    }
}

pub fn worker_fn<P, F>(func: F) -> FnWorker<P, F>
where
    P: Send + 'static,
    F: FnMut(&WorkerContext<'_>, Tag, P) -> Result<(), ThreadError> + Send + 'static,
{
    FnWorker {
        func,
        _payload: PhantomData,
    }
}

impl<P, F> Worker for FnWorker<P, F>
where
    P: Send + 'static,
    F: FnMut(&WorkerContext<'_>, Tag, P) -> Result<(), ThreadError> + Send + 'static,
{
    type Payload = P;

    fn process(&mut self, cx: &WorkerContext<'_>, tag: Tag, payload: P) -> Result<(), ThreadError> {
        (self.func)(cx, tag, payload)
    }
}
