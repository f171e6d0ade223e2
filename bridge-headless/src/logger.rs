//! Capturing logger sink.

use bridge_traits::{error::Result, LogEntry, LogLevel, LoggerSink};
use parking_lot::Mutex;

/// Logger sink that keeps every entry in memory.
#[derive(Debug)]
pub struct MemoryLoggerSink {
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl MemoryLoggerSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages of captured entries at `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for MemoryLoggerSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LoggerSink for MemoryLoggerSink {
    fn log(&self, entry: LogEntry) -> Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
