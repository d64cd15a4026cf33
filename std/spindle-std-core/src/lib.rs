//!
//! spindle-std-core - Fault Reporting and Console Output
//!
//! This crate provides the collaborators every spindle crate leans on:
//!
//! - `Fault` and the `FaultReporter` capability for contract violations
//! - `assert_true` / `assert_always`, which record the caller location
//! - `AbortReporter`, the process-wide log-and-abort policy
//! - `RecordingReporter`, which collects faults instead of aborting
//! - `ConsoleSink` for best-effort line output (`StdoutSink`, `MemorySink`)
//!

pub mod console;
pub mod fault;

pub use console::*;
pub use fault::*;
