//! Profiler spans
//!
//! A [`LogProfiler`] is opened from a [`Logger`] and writes through it: a
//! START marker on creation, one entry per tick, and exactly one FINISH
//! marker when it is disposed or dropped. Every profiler entry carries
//! `uid`, `elapsed_ms` and, where the platform reports it, `memory_delta`
//! context fields.

use super::{log_context::LogContext, logger::Logger, severity::Severity};
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use uuid::Uuid;

// One `System` per thread; building it is not free.
thread_local! {
    static PROCESS_SYSTEM: RefCell<Option<System>> = const { RefCell::new(None) };
}

/// Resident memory of the current process in bytes, if available
pub fn process_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    PROCESS_SYSTEM.with(|cell| {
        let mut cell = cell.borrow_mut();
        let system = cell.get_or_insert_with(System::new);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system.process(pid).map(|process| process.memory())
    })
}

pub struct LogProfiler {
    uid: Uuid,
    parent: Logger,
    identifier: String,
    severity: Severity,
    started_at: DateTime<Local>,
    start: Instant,
    start_memory: Option<u64>,
    /// Elapsed time frozen at disposal; set exactly once
    finished: OnceLock<Duration>,
}

impl LogProfiler {
    pub(crate) fn start(parent: Logger, identifier: String, severity: Severity) -> Self {
        let profiler = Self {
            uid: Uuid::new_v4(),
            parent,
            identifier,
            severity,
            started_at: Local::now(),
            start: Instant::now(),
            start_memory: process_memory(),
            finished: OnceLock::new(),
        };
        profiler.emit(profiler.severity, || "START");
        profiler
    }

    pub fn uid(&self) -> Uuid {
        self.uid
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The logger this span writes through
    pub fn parent(&self) -> &Logger {
        &self.parent
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Time since creation while open; frozen at the moment of disposal
    pub fn elapsed(&self) -> Duration {
        match self.finished.get() {
            Some(elapsed) => *elapsed,
            None => self.start.elapsed(),
        }
    }

    /// Current resident memory of the process in bytes
    pub fn total_memory(&self) -> Option<u64> {
        process_memory()
    }

    /// Memory growth since the span opened, in bytes
    pub fn memory_delta(&self) -> Option<i64> {
        let start = self.start_memory?;
        let now = process_memory()?;
        Some(now as i64 - start as i64)
    }

    pub fn is_disposed(&self) -> bool {
        self.finished.get().is_some()
    }

    /// Close the span and emit FINISH. Later calls do nothing.
    pub fn dispose(&self) {
        if self.finished.set(self.start.elapsed()).is_ok() {
            self.emit(self.severity, || "FINISH");
        }
    }

    /// Emit `"<identifier> <message>"` at `severity`; ignored once disposed
    pub fn tick(&self, severity: Severity, message: impl AsRef<str>) {
        if self.is_disposed() {
            return;
        }
        self.emit(severity, || message.as_ref());
    }

    /// Like [`LogProfiler::tick`], rendering `args` only when the entry
    /// passes the parent's filter. This is what the logging macros call.
    pub fn write_args(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if self.is_disposed() {
            return;
        }
        self.emit(severity, || args);
    }

    pub fn trace(&self, message: impl AsRef<str>) {
        self.tick(Severity::Trace, message);
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.tick(Severity::Debug, message);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.tick(Severity::Info, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.tick(Severity::Warn, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.tick(Severity::Error, message);
    }

    pub fn fatal(&self, message: impl AsRef<str>) {
        self.tick(Severity::Fatal, message);
    }

    fn emit<F, M>(&self, severity: Severity, render: F)
    where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        // filtered entries never read process memory or render
        if !self.parent.is_enabled(severity) {
            return;
        }

        let mut context = LogContext::new()
            .with_field("uid", self.uid.to_string())
            .with_field("elapsed_ms", self.elapsed().as_millis() as i64);
        if let Some(delta) = self.memory_delta() {
            context.add_field("memory_delta", delta);
        }

        self.parent.write_with_context(
            severity,
            format!("{} {}", self.identifier, render()),
            context,
        );
    }
}

impl Drop for LogProfiler {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LogProfiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogProfiler")
            .field("uid", &self.uid)
            .field("identifier", &self.identifier)
            .field("parent", &self.parent)
            .field("elapsed", &self.elapsed())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
