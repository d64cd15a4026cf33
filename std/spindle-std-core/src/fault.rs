//!
//! Fault Reporting
//!
//! A fault is a contract violation: a programming error in the application,
//! never a recoverable runtime condition. Faults are handed to a
//! `FaultReporter`, which decides what happens next:
//!
//! - `AbortReporter` logs the fault and aborts the process
//! - `RecordingReporter` keeps the fault so tests can observe it
//!
//! `assert_true` and `assert_always` capture the caller's file and line
//! through `#[track_caller]`, so the report points at the violated check.
//!

use std::fmt;
use std::panic::Location;
use std::sync::{Mutex, PoisonError};

/// A single contract violation with the location that detected it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
    pub file: &'static str,
    pub line: u32,
}

impl Fault {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            message: message.into(),
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

/// Receives contract violations.
///
/// Implementations must be shareable across worker threads. A reporter may
/// return from `report`; callers treat the violating operation as failed
/// either way.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: &Fault);
}

/// Log the fault and abort the process
pub fn fatal(fault: &Fault) -> ! {
    tracing::error!(file = fault.file, line = fault.line, "{}", fault.message);
    eprintln!("Fault [{}]", fault);
    std::process::abort();
}

/// The default policy: every fault is fatal
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortReporter;

impl FaultReporter for AbortReporter {
    fn report(&self, fault: &Fault) {
        fatal(fault);
    }
}

/// Collects faults instead of terminating
#[derive(Debug, Default)]
pub struct RecordingReporter {
    faults: Mutex<Vec<Fault>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl FaultReporter for RecordingReporter {
    fn report(&self, fault: &Fault) {
        tracing::error!(file = fault.file, line = fault.line, "{}", fault.message);
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fault.clone());
    }
}

/// Report a fault when `condition` is false. Returns `condition`.
#[track_caller]
pub fn assert_true(reporter: &dyn FaultReporter, condition: bool, message: &str) -> bool {
    if !condition {
        reporter.report(&Fault::new(format!("assertion failed: {}", message)));
    }
    condition
}

/// Report a fault unconditionally. Used for unreachable cases.
#[track_caller]
pub fn assert_always(reporter: &dyn FaultReporter, message: &str) {
    reporter.report(&Fault::new(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_true_passes_silently() {
        let reporter = RecordingReporter::new();
        assert!(assert_true(&reporter, true, "never reported"));
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_assert_true_records_failure_with_location() {
        let reporter = RecordingReporter::new();
        let line = line!() + 1;
        let passed = assert_true(&reporter, 1 + 1 == 3, "arithmetic");

        assert!(!passed);
        let faults = reporter.faults();
        assert_eq!(faults.len(), 1);
        assert!(faults[0].message.contains("arithmetic"));
        assert!(faults[0].file.ends_with("fault.rs"));
        assert_eq!(faults[0].line, line);
    }

    #[test]
    fn test_assert_always_records() {
        let reporter = RecordingReporter::new();
        assert_always(&reporter, "unreachable tag");
        assert_always(&reporter, "second");

        let faults = reporter.faults();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].message, "unreachable tag");
        assert_eq!(faults[1].message, "second");
    }

    #[test]
    fn test_fault_display_includes_location() {
        let fault = Fault::new("bad tag");
        let rendered = fault.to_string();
        assert!(rendered.contains("fault.rs:"));
        assert!(rendered.ends_with("bad tag"));
    }
}
