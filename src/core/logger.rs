//! Per-category logger façade

use super::{
    log_context::LogContext,
    log_entry::LogEntry,
    manager::{DispatchCore, LogManager},
    profiler::LogProfiler,
    severity::Severity,
};
use std::fmt;
use std::sync::Arc;

/// A logger bound to one category name.
///
/// Loggers are cheap handles: cloning one clones two `Arc`s. Two loggers are
/// equal when they carry the same name and dispatch through the same manager.
///
/// # Example
///
/// ```
/// use rust_log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryHandler::new());
/// let manager = LogManager::builder().shared_handler(memory.clone()).build();
///
/// let logger = manager.get("Orders");
/// logger.info("order placed");
/// logger.debug("below the Info threshold");
///
/// assert_eq!(memory.messages(), vec!["order placed".to_string()]);
/// ```
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    core: Arc<DispatchCore>,
}

impl Logger {
    pub(crate) fn new(name: &str, core: Arc<DispatchCore>) -> Self {
        Self {
            name: Arc::from(name),
            core,
        }
    }

    /// Logger for `category` on the process-wide manager
    pub fn get(category: &str) -> Logger {
        LogManager::global().get(category)
    }

    /// Logger named after `T` on the process-wide manager
    pub fn get_for<T: ?Sized>() -> Logger {
        LogManager::global().get_for::<T>()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an entry at `severity` would currently be dispatched
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        let settings = self.core.settings();
        severity >= settings.severity && settings.types.is_enabled(&self.name)
    }

    /// Dispatch a message at `severity` if it passes the filter
    pub fn write(&self, severity: Severity, message: impl AsRef<str>) {
        self.emit(severity, None, || message.as_ref().to_owned());
    }

    /// Like [`Logger::write`], rendering `args` only when the filter passes
    pub fn write_args(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.emit(severity, None, || fmt::format(args));
    }

    /// Dispatch a message carrying structured fields
    pub fn write_with_context(
        &self,
        severity: Severity,
        message: impl AsRef<str>,
        context: LogContext,
    ) {
        self.emit(severity, Some(context), || message.as_ref().to_owned());
    }

    /// Filter, then build the entry and fan it out. `render` runs only
    /// after the filter has passed.
    fn emit<F>(&self, severity: Severity, context: Option<LogContext>, render: F)
    where
        F: FnOnce() -> String,
    {
        let settings = self.core.settings();
        if severity < settings.severity || !settings.types.is_enabled(&self.name) {
            self.core.metrics().record_filtered();
            return;
        }

        let mut entry = LogEntry::new(severity, &*self.name, render())
            .with_source(settings.source.clone());
        entry.context = context;
        self.core.dispatch(&entry);
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.write(Severity::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.write(Severity::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.write(Severity::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.write(Severity::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.write(Severity::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.write(Severity::Fatal, message);
    }

    /// Open a profiler span; emits `"<identifier> START"` at Debug
    pub fn profiler(&self, identifier: impl Into<String>) -> LogProfiler {
        LogProfiler::start(self.clone(), identifier.into(), Severity::Debug)
    }

    /// Open a profiler span whose START/FINISH markers use `severity`
    pub fn profiler_at(&self, identifier: impl Into<String>, severity: Severity) -> LogProfiler {
        LogProfiler::start(self.clone(), identifier.into(), severity)
    }

    /// Run `work` inside a profiler span. FINISH is emitted when `work`
    /// returns, and also when it panics.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let memory = Arc::new(MemoryHandler::new());
    /// let manager = LogManager::builder()
    ///     .severity(Severity::Debug)
    ///     .shared_handler(memory.clone())
    ///     .build();
    ///
    /// let total = manager.get("Import").profile("load", |span| {
    ///     span.debug("parsed");
    ///     42
    /// });
    ///
    /// assert_eq!(total, 42);
    /// assert_eq!(
    ///     memory.messages(),
    ///     vec!["load START", "load parsed", "load FINISH"]
    /// );
    /// ```
    pub fn profile<R, F>(&self, identifier: impl Into<String>, work: F) -> R
    where
        F: FnOnce(&LogProfiler) -> R,
    {
        let span = self.profiler(identifier);
        work(&span)
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CategorySet, LogManager, Settings};
    use crate::handlers::MemoryHandler;

    fn manager_with(settings: Settings) -> (LogManager, Arc<MemoryHandler>) {
        let memory = Arc::new(MemoryHandler::new());
        let manager = LogManager::builder()
            .settings(settings)
            .shared_handler(memory.clone())
            .build();
        (manager, memory)
    }

    #[test]
    fn test_severity_methods() {
        let (manager, memory) = manager_with(Settings {
            severity: Severity::Trace,
            ..Settings::default()
        });
        let logger = manager.get("Orders");

        logger.trace("t");
        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");
        logger.fatal("f");

        let severities: Vec<Severity> = memory.entries().iter().map(|e| e.severity).collect();
        assert_eq!(severities, Severity::ALL.to_vec());
    }

    #[test]
    fn test_category_filter() {
        let (manager, memory) = manager_with(Settings {
            types: CategorySet::only(["Orders"]),
            ..Settings::default()
        });

        manager.get("Orders").info("kept");
        manager.get("Billing").info("dropped");

        assert_eq!(memory.messages(), vec!["kept".to_string()]);
        assert_eq!(manager.metrics().filtered(), 1);
    }

    #[test]
    fn test_filtered_write_does_not_render() {
        struct Loud;
        impl fmt::Display for Loud {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                panic!("rendered a filtered message");
            }
        }

        let (manager, memory) = manager_with(Settings::default());
        manager
            .get("Orders")
            .write_args(Severity::Debug, format_args!("{}", Loud));
        assert!(memory.is_empty());
    }

    #[test]
    fn test_entry_carries_name_and_source() {
        let (manager, memory) = manager_with(Settings {
            source: Some("checkout".to_string()),
            ..Settings::default()
        });
        manager.get("Orders").warn("late");

        let entry = &memory.entries()[0];
        assert_eq!(entry.type_name, "Orders");
        assert_eq!(entry.source.as_deref(), Some("checkout"));
    }

    #[test]
    fn test_is_enabled_tracks_settings() {
        let (manager, _memory) = manager_with(Settings::default());
        let logger = manager.get("Orders");

        assert!(!logger.is_enabled(Severity::Debug));
        manager.update_settings(|s| s.severity = Severity::Debug);
        assert!(logger.is_enabled(Severity::Debug));
        manager.update_settings(|s| s.types = CategorySet::none());
        assert!(!logger.is_enabled(Severity::Fatal));
    }
}
