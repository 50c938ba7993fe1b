//! In-memory capture handler

use crate::core::{Formatter, FormatterSlot, Handler, LogEntry, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps every entry it receives. Useful for tests and for embedders that
/// display recent log lines themselves.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    name: String,
    entries: Mutex<Vec<LogEntry>>,
    formatter: FormatterSlot,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(Vec::new()),
            formatter: FormatterSlot::default(),
        }
    }

    /// Copies of the captured entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Captured entries rendered with this handler's formatter
    pub fn lines(&self) -> Vec<String> {
        let formatter = self.formatter.get();
        self.entries
            .lock()
            .iter()
            .map(|e| formatter.format(e))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Handler for MemoryHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.get()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter.set(formatter);
    }
}
