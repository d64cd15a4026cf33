//!
//! spindle-std-threads - Named Worker Threads
//!
//! Each `ThreadHandle` owns one OS thread and one FIFO message queue. The
//! thread runs a loop that pops messages in posting order and hands each
//! application payload to a user-supplied `Worker`.
//!
//! ## Lifecycle
//!
//! ```text
//! Created --create()--> WaitingToStart --start_all()--> Running
//!         --exit request dequeued--> ExitRequested --loop returns--> Terminated
//! ```
//!
//! - `ThreadRegistry::register` builds a handle and keeps a weak reference
//! - `ThreadHandle::create` spawns the thread, which parks on the start gate
//! - `ThreadRegistry::start_all` opens the gate for every thread at once
//! - `ThreadHandle::post_message` enqueues without blocking
//! - `ThreadHandle::request_exit` enqueues the exit request and joins
//!
//! ## Ownership
//!
//! Payloads move into the queue on post and out of it into `Worker::process`.
//! Payloads still queued when a thread goes away are dropped with the queue.
//! A thread asked to exit before it started reports the messages it dropped.
//!
//! ## Contract violations
//!
//! Boundary misuse (double create, post before create, reserved tags) comes
//! back as `ThreadError`. A worker rejecting a message is reported to the
//! registry's `FaultReporter` on the worker thread; the default reporter
//! aborts the process.
//!

pub mod error;
pub mod gate;
pub mod handle;
pub mod message;
pub mod queue;
pub mod registry;
pub mod state;
pub mod worker;

pub use error::*;
pub use gate::*;
pub use handle::*;
pub use message::*;
pub use queue::*;
pub use registry::*;
pub use state::*;
pub use worker::*;
