use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for display strings. Called from the command path and from
/// the listener task at the same time, so implementations must be
/// thread-safe.
pub trait OutputSink: Send + Sync {
    fn print_result(&self, msg: &str);
}

/// Writes each message as one line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for StdoutSink {
    fn print_result(&self, msg: &str) {
        let mut out = io::stdout().lock();
        // Nowhere left to report a failing stdout.
        let _ = writeln!(out, "{msg}");
        let _ = out.flush();
    }
}

/// Collects messages in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl OutputSink for BufferSink {
    fn print_result(&self, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(msg.to_string());
    }
}
