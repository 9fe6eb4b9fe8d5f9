//! Controller log sink.
//!
//! The host renders these lines on its own display, so they are kept apart
//! from `tracing` output. Every recorded line is also emitted as a `tracing`
//! event for the embedding process.

use std::collections::VecDeque;

/// One rendered log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Monotonic sequence number, starting at 0.
    pub seq: u64,
    /// Host time in milliseconds when the line was recorded.
    pub at_ms: u128,
    /// Line text.
    pub text: String,
}

/// Ordered sink of log lines.
pub trait LogSink {
    /// Record a line.
    fn record(&mut self, at_ms: u128, text: String);
}

/// Bounded in-memory log; the oldest line is dropped when full.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    max_lines: usize,
    next_seq: u64,
}

impl LogBuffer {
    /// Create a buffer holding at most `max_lines` lines.
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines),
            max_lines,
            next_seq: 0,
        }
    }

    /// Snapshot of the buffered lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }

    /// Iterate over buffered line texts, oldest first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    /// Count buffered lines whose text equals `text`.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        self.texts().filter(|t| *t == text).count()
    }

    /// Number of buffered lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every buffered line. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl LogSink for LogBuffer {
    fn record(&mut self, at_ms: u128, text: String) {
        tracing::info!(target: "doorwarden::log", seq = self.next_seq, "{text}");
        if self.max_lines == 0 {
            self.next_seq += 1;
            return;
        }
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            seq: self.next_seq,
            at_ms,
            text,
        });
        self.next_seq += 1;
    }
}
