///
/// Console Output
///
/// Line-oriented output used by workers to report processed messages.
/// Writes are best-effort: a failed write is dropped, never propagated
/// back into the thread runtime.
///

use std::io::Write;
use std::sync::{Mutex, PoisonError};

pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes each line to stdout, holding the lock for the whole line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

/// Keeps lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConsoleSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
