//! Batching database handler
//!
//! Entries are buffered and persisted through a [`SqlExecutor`] with one
//! parameterized INSERT per entry, in arrival order. The buffer is swapped
//! out and flushed while its mutex is held, so two writers can never flush
//! overlapping batches. A failed flush drops the batch; nothing is retried.

use crate::core::diagnostics;
use crate::core::{
    DatabaseInfo, Formatter, FormatterSlot, Handler, LogEntry, LoggerError, Result, Settings,
};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Null,
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

/// Statement text with positional parameters (`?1`, `?2`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct SqlCommand {
    pub text: String,
    pub params: Vec<SqlValue>,
}

impl SqlCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Executes statements against some database
///
/// Implementations own their connection handling and timeouts. Closures of
/// the shape `Fn(&SqlCommand) -> Result<u64>` implement this directly.
pub trait SqlExecutor: Send + Sync {
    /// Run a statement that returns no rows; yields the affected row count
    fn execute_non_query(&self, command: &SqlCommand) -> Result<u64>;
}

impl<F> SqlExecutor for F
where
    F: Fn(&SqlCommand) -> Result<u64> + Send + Sync,
{
    fn execute_non_query(&self, command: &SqlCommand) -> Result<u64> {
        self(command)
    }
}

/// `INSERT INTO {table} ({severity}, {type}, {message}, {date}) VALUES (?1, ?2, ?3, ?4)`
pub fn insert_statement(info: &DatabaseInfo) -> String {
    format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4)",
        info.table_name,
        info.severity_column,
        info.type_column,
        info.message_column,
        info.date_column
    )
}

struct BatchState {
    buffer: Mutex<Vec<LogEntry>>,
    executor: Arc<dyn SqlExecutor>,
    insert_text: String,
    batch_size: usize,
}

impl BatchState {
    fn command_for(&self, entry: &LogEntry) -> SqlCommand {
        SqlCommand::new(self.insert_text.as_str())
            .param(entry.severity.name())
            .param(entry.type_name.as_str())
            .param(entry.message.as_str())
            .param(entry.date.to_rfc3339())
    }

    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut buffer = self.buffer.lock();
        buffer.push(entry.clone());
        if buffer.len() >= self.batch_size {
            self.flush_locked(&mut buffer)
        } else {
            Ok(())
        }
    }

    fn flush(&self) -> Result<()> {
        let mut buffer = self.buffer.lock();
        self.flush_locked(&mut buffer)
    }

    /// Takes the whole buffer before executing; a failure loses the rest of
    /// the batch but never re-inserts rows that were already committed.
    fn flush_locked(&self, buffer: &mut Vec<LogEntry>) -> Result<()> {
        let batch = std::mem::take(buffer);
        for (index, entry) in batch.iter().enumerate() {
            self.executor
                .execute_non_query(&self.command_for(entry))
                .map_err(|e| {
                    LoggerError::sql(
                        self.insert_text.as_str(),
                        format!(
                            "{} (dropped {} of {} buffered entries)",
                            e,
                            batch.len() - index,
                            batch.len()
                        ),
                    )
                })?;
        }
        Ok(())
    }
}

/// Shortest interval accepted by [`DatabaseHandler::with_flush_interval`]
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

struct FlushTimer {
    interval: Duration,
    shutdown: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FlushTimer {
    fn spawn(state: Arc<BatchState>, interval: Duration) -> Self {
        let (shutdown, ticks) = bounded::<()>(1);
        let handle = thread::spawn(move || loop {
            match ticks.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = state.flush() {
                        diagnostics::error(format_args!("Timed database flush failed: {}", e));
                    }
                }
                // shutdown requested or handler dropped
                _ => break,
            }
        });

        Self {
            interval,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    fn stop(&mut self) {
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                diagnostics::error(format_args!("Database flush timer panicked"));
            }
        }
    }
}

/// Buffers entries and writes them to a table in batches
pub struct DatabaseHandler {
    state: Arc<BatchState>,
    timer: Option<FlushTimer>,
    formatter: FormatterSlot,
}

impl DatabaseHandler {
    /// A `batch_size` of 0 writes every entry immediately
    pub fn new(executor: Arc<dyn SqlExecutor>, info: DatabaseInfo, batch_size: usize) -> Self {
        Self {
            state: Arc::new(BatchState {
                buffer: Mutex::new(Vec::with_capacity(batch_size)),
                executor,
                insert_text: insert_statement(&info),
                batch_size,
            }),
            timer: None,
            formatter: FormatterSlot::default(),
        }
    }

    /// Uses `database`, `batch_size` and `flush_interval` from the settings
    pub fn from_settings(executor: Arc<dyn SqlExecutor>, settings: &Settings) -> Self {
        let handler = Self::new(executor, settings.database.clone(), settings.batch_size);
        match settings.flush_interval {
            Some(interval) => handler.with_flush_interval(interval),
            None => handler,
        }
    }

    /// Also flush partially filled batches every `interval`.
    ///
    /// Intervals below [`MIN_FLUSH_INTERVAL`] are raised to it.
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        let interval = if interval < MIN_FLUSH_INTERVAL {
            diagnostics::warning(format_args!(
                "Database flush interval {:?} is below the minimum, using {:?}",
                interval, MIN_FLUSH_INTERVAL
            ));
            MIN_FLUSH_INTERVAL
        } else {
            interval
        };
        self.timer = Some(FlushTimer::spawn(Arc::clone(&self.state), interval));
        self
    }

    pub fn batch_size(&self) -> usize {
        self.state.batch_size
    }

    /// Period of the background flush, if one is running
    pub fn flush_interval(&self) -> Option<Duration> {
        self.timer.as_ref().map(|timer| timer.interval)
    }

    /// Entries waiting for the next flush
    pub fn pending(&self) -> usize {
        self.state.buffer.lock().len()
    }

    pub fn insert_text(&self) -> &str {
        &self.state.insert_text
    }
}

impl Handler for DatabaseHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.state.append(entry)
    }

    fn flush(&self) -> Result<()> {
        self.state.flush()
    }

    fn name(&self) -> &str {
        "database"
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.get()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter.set(formatter);
    }
}

impl Drop for DatabaseHandler {
    fn drop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        if let Err(e) = self.state.flush() {
            diagnostics::error(format_args!("Final database flush failed: {}", e));
        }
    }
}

impl fmt::Debug for DatabaseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseHandler")
            .field("insert_text", &self.state.insert_text)
            .field("batch_size", &self.state.batch_size)
            .field("pending", &self.pending())
            .field("timed_flush", &self.timer.is_some())
            .finish()
    }
}
