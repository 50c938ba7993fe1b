//! Background-worker wrapper for slow handlers

use crate::core::diagnostics;
use crate::core::{Formatter, Handler, LogEntry, LoggerError, Result};
use crossbeam_channel::{bounded, Sender};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

enum Command {
    Write(LogEntry),
    Flush(Sender<Result<()>>),
}

/// Hands entries to a worker thread that writes them to the wrapped handler
///
/// The queue is bounded and `append` blocks while it is full, so entries are
/// never dropped. Entries reach the inner handler in the order they were
/// queued. Dropping the wrapper drains the queue and joins the worker.
///
/// `write` returning `true` means the entry was queued; failures of the
/// inner handler are reported on the diagnostic channel. A panic inside the
/// inner handler is also returned by the next `flush`.
pub struct AsyncHandler {
    inner: Arc<dyn Handler>,
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AsyncHandler {
    pub fn new(inner: Arc<dyn Handler>) -> Self {
        Self::with_capacity(inner, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn Handler>, capacity: usize) -> Self {
        let (sender, receiver) = bounded::<Command>(capacity.max(1));
        let target = Arc::clone(&inner);

        let worker = thread::spawn(move || {
            // first panic since the last flush, handed back by that flush
            let mut panicked: Option<LoggerError> = None;

            // ends once every sender is gone and the queue is empty
            for command in receiver {
                match command {
                    Command::Write(entry) => {
                        let written =
                            panic::catch_unwind(AssertUnwindSafe(|| target.write(&entry)));
                        if let Err(payload) = written {
                            let err = diagnostics::handler_panic(target.name(), payload.as_ref());
                            diagnostics::critical(format_args!("{} in background worker", err));
                            panicked.get_or_insert(err);
                        }
                    }
                    Command::Flush(ack) => {
                        let flushed = target.flush();
                        let _ = ack.send(match panicked.take() {
                            Some(err) => Err(err),
                            None => flushed,
                        });
                    }
                }
            }
        });

        Self {
            inner,
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }

    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or(LoggerError::ChannelSendError)?
            .send(command)
            .map_err(|_| LoggerError::ChannelSendError)
    }
}

impl Handler for AsyncHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        self.send(Command::Write(entry.clone()))
    }

    /// Waits until everything queued before the call has been written, then
    /// flushes the inner handler. Fails with [`LoggerError::HandlerPanicked`]
    /// if the inner handler panicked since the previous flush.
    fn flush(&self) -> Result<()> {
        let (ack, done) = bounded(1);
        self.send(Command::Flush(ack))?;
        done.recv().map_err(|_| LoggerError::ChannelSendError)?
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.inner.formatter()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.inner.set_formatter(formatter);
    }
}

impl Drop for AsyncHandler {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                diagnostics::error(format_args!(
                    "Background worker for '{}' terminated abnormally",
                    self.inner.name()
                ));
            }
        }
        if let Err(e) = self.inner.flush() {
            diagnostics::error(format_args!(
                "Failed to flush '{}' during shutdown: {}",
                self.inner.name(),
                e
            ));
        }
    }
}

impl fmt::Debug for AsyncHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncHandler")
            .field("inner", &self.inner.name())
            .field("running", &self.worker.is_some())
            .finish()
    }
}
