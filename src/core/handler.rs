//! Handler trait for log sinks

use super::{
    diagnostics,
    error::Result,
    formatter::{DefaultFormatter, Formatter},
    log_entry::LogEntry,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// A sink that persists or displays entries.
///
/// Handlers are shared between threads and registered with a
/// [`LogManager`](super::LogManager) as `Arc<dyn Handler>`, so every method
/// takes `&self`; implementations guard their own mutable state.
pub trait Handler: Send + Sync {
    /// Persist one entry, reporting failure as an error
    fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Persist one entry and report success.
    ///
    /// Never fails across this boundary: errors from [`Handler::append`] are
    /// traced to stderr and turned into `false`.
    fn write(&self, entry: &LogEntry) -> bool {
        match self.append(entry) {
            Ok(()) => true,
            Err(e) => {
                diagnostics::error(format_args!("Handler '{}' failed: {}", self.name(), e));
                false
            }
        }
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    fn formatter(&self) -> Arc<dyn Formatter>;

    fn set_formatter(&self, formatter: Arc<dyn Formatter>);
}

/// Replaceable formatter owned by a handler
pub struct FormatterSlot {
    inner: RwLock<Arc<dyn Formatter>>,
}

impl FormatterSlot {
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            inner: RwLock::new(formatter),
        }
    }

    pub fn get(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.inner.read())
    }

    pub fn set(&self, formatter: Arc<dyn Formatter>) {
        *self.inner.write() = formatter;
    }

    pub fn format(&self, entry: &LogEntry) -> String {
        self.get().format(entry)
    }
}

impl Default for FormatterSlot {
    fn default() -> Self {
        Self::new(DefaultFormatter::shared())
    }
}

impl std::fmt::Debug for FormatterSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterSlot").finish_non_exhaustive()
    }
}
