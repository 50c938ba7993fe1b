//! Central log router
//!
//! A [`LogManager`] owns the active [`Settings`], the handler registry and the
//! dispatch metrics, and hands out per-category [`Logger`] façades. Managers
//! are cheap to clone; clones share all state.

use super::{
    diagnostics,
    error::{LoggerError, Result},
    handler::Handler,
    log_entry::LogEntry,
    logger::Logger,
    metrics::DispatchMetrics,
    registry::{HandlerRegistry, HandlerSnapshot},
    settings::Settings,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<LogManager> = OnceLock::new();

/// State shared by a manager and every logger it created
pub(crate) struct DispatchCore {
    settings: RwLock<Arc<Settings>>,
    /// Serializes `update_settings` calls; never taken on the logging path
    updates: Mutex<()>,
    registry: HandlerRegistry,
    metrics: DispatchMetrics,
}

impl DispatchCore {
    /// Active settings; re-read on every call so changes apply immediately
    #[inline]
    pub(crate) fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings.read())
    }

    pub(crate) fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Hand `entry` to every registered handler in registration order.
    ///
    /// Each handler is isolated: a `false` return or a panic is counted and
    /// traced, and delivery continues with the next handler. Returns the
    /// number of handlers that failed.
    pub(crate) fn dispatch(&self, entry: &LogEntry) -> usize {
        let handlers = self.registry.snapshot();
        self.metrics.record_dispatched();

        let mut failures = 0;
        for (idx, handler) in handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.write(entry)
            }));

            match result {
                Ok(true) => {}
                Ok(false) => {
                    self.metrics.record_handler_failure();
                    failures += 1;
                }
                Err(panic_info) => {
                    let err = diagnostics::handler_panic(handler.name(), panic_info.as_ref());
                    diagnostics::critical(format_args!(
                        "{} (handler #{}). Other handlers continue to function.",
                        err, idx
                    ));
                    self.metrics.record_handler_panic();
                    self.metrics.record_handler_failure();
                    failures += 1;
                }
            }
        }
        failures
    }
}

#[derive(Clone)]
pub struct LogManager {
    core: Arc<DispatchCore>,
    loggers: Arc<RwLock<HashMap<String, Logger>>>,
}

impl LogManager {
    /// Manager with the given settings and no handlers
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_handlers(settings, Vec::new())
    }

    #[must_use]
    pub fn with_handlers(settings: Settings, handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            core: Arc::new(DispatchCore {
                settings: RwLock::new(Arc::new(settings)),
                updates: Mutex::new(()),
                registry: HandlerRegistry::with_handlers(handlers),
                metrics: DispatchMetrics::new(),
            }),
            loggers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Manager with the console/file handlers described by `settings`
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let handlers = crate::handlers::handlers_from_settings(&settings)?;
        Ok(Self::with_handlers(settings, handlers))
    }

    #[must_use]
    pub fn builder() -> LogManagerBuilder {
        LogManagerBuilder::new()
    }

    /// Logger bound to `category`, created on first use and cached
    pub fn get(&self, category: &str) -> Logger {
        if let Some(logger) = self.loggers.read().get(category) {
            return logger.clone();
        }

        let mut loggers = self.loggers.write();
        loggers
            .entry(category.to_string())
            .or_insert_with(|| Logger::new(category, Arc::clone(&self.core)))
            .clone()
    }

    /// Logger named after the short type name of `T`
    pub fn get_for<T: ?Sized>(&self) -> Logger {
        self.get(short_type_name::<T>())
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.core.settings()
    }

    /// Swap in a new settings snapshot; the next logging call sees it
    pub fn set_settings(&self, settings: Settings) {
        *self.core.settings.write() = Arc::new(settings);
    }

    /// Copy the active settings, apply `update`, and swap the result in.
    ///
    /// `update` runs without the settings lock, so it may log through this
    /// manager; those entries are filtered by the settings being replaced.
    /// Concurrent updates are applied one after another. `update` must not
    /// call `update_settings` on the same manager.
    pub fn update_settings<F>(&self, update: F)
    where
        F: FnOnce(&mut Settings),
    {
        let _serial = self.core.updates.lock();
        let mut next = Settings::clone(&self.core.settings());
        update(&mut next);
        *self.core.settings.write() = Arc::new(next);
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.core.registry.add(handler);
    }

    pub fn remove_handler(&self, name: &str) -> usize {
        self.core.registry.remove(name)
    }

    pub fn set_handlers(&self, handlers: Vec<Arc<dyn Handler>>) {
        self.core.registry.replace(handlers);
    }

    pub fn clear_handlers(&self) {
        self.core.registry.clear();
    }

    pub fn handlers(&self) -> HandlerSnapshot {
        self.core.registry.snapshot()
    }

    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::{LogManager, Settings};
    ///
    /// let manager = LogManager::new(Settings::default());
    /// manager.get("Orders").debug("filtered at the default Info threshold");
    /// assert_eq!(manager.metrics().filtered(), 1);
    /// ```
    pub fn metrics(&self) -> &DispatchMetrics {
        self.core.metrics()
    }

    /// Flush every handler; all handlers are flushed even if one fails, and
    /// the first error is returned
    pub fn flush(&self) -> Result<()> {
        let mut first_error: Option<LoggerError> = None;
        for handler in self.handlers().iter() {
            if let Err(e) = handler.flush() {
                diagnostics::error(format_args!(
                    "Handler '{}' flush failed: {}",
                    handler.name(),
                    e
                ));
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Install the process-wide manager; fails if one is already installed
    pub fn init_global(manager: LogManager) -> Result<&'static LogManager> {
        GLOBAL
            .set(manager)
            .map_err(|_| LoggerError::config("LogManager", "global manager already initialized"))?;
        GLOBAL
            .get()
            .ok_or_else(|| LoggerError::other("global manager unavailable after initialization"))
    }

    /// Process-wide manager, built from [`Settings::from_env`] on first access.
    ///
    /// A malformed or unreadable settings file is returned as an error and
    /// leaves the global slot empty.
    pub fn try_global() -> Result<&'static LogManager> {
        if let Some(manager) = GLOBAL.get() {
            return Ok(manager);
        }
        let manager = LogManager::from_settings(Settings::from_env()?)?;
        Ok(GLOBAL.get_or_init(|| manager))
    }

    /// Like [`LogManager::try_global`], falling back to a handler-less
    /// default manager after reporting a configuration failure on stderr
    pub fn global() -> &'static LogManager {
        match Self::try_global() {
            Ok(manager) => manager,
            Err(e) => {
                diagnostics::warning(format_args!(
                    "Failed to load logging settings, using defaults: {}",
                    e
                ));
                GLOBAL.get_or_init(|| LogManager::new(Settings::default()))
            }
        }
    }
}

impl std::fmt::Debug for LogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogManager")
            .field("settings", &self.settings())
            .field("handlers", &self.core.registry)
            .finish()
    }
}

/// Last path segment of a type name, without generic arguments
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Builder for constructing a LogManager with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatch::prelude::*;
///
/// let manager = LogManager::builder()
///     .severity(Severity::Debug)
///     .handler(MemoryHandler::new())
///     .build();
/// manager.get("Orders").debug("visible");
/// ```
pub struct LogManagerBuilder {
    settings: Settings,
    handlers: Vec<Arc<dyn Handler>>,
}

impl LogManagerBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            handlers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn severity(mut self, severity: super::Severity) -> Self {
        self.settings.severity = severity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Register an already shared handler, keeping a handle for inspection
    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> LogManager {
        LogManager::with_handlers(self.settings, self.handlers)
    }
}

impl Default for LogManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
