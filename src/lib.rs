//! # Rust Log Dispatch
//!
//! A structured-logging dispatch engine: loggers filter entries by severity
//! and category, then fan them out to pluggable handlers. Profiler spans
//! time a scope and log its start, ticks and finish.
//!
//! ## Features
//!
//! - **Runtime filtering**: severity threshold and category set re-read on every call
//! - **Pluggable handlers**: console, file, batching database, email, in-memory
//! - **Fault isolation**: a failing or panicking handler never affects the others
//! - **Profiler spans**: RAII timing with elapsed time and memory deltas
//!
//! ## Example
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryHandler::new());
//! let manager = LogManager::builder()
//!     .severity(Severity::Debug)
//!     .shared_handler(memory.clone())
//!     .build();
//!
//! let logger = manager.get("Orders");
//! logger.info("order placed");
//! {
//!     let span = logger.profiler("checkout");
//!     span.info("payment authorized");
//! }
//!
//! assert_eq!(memory.len(), 4);
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        CategorySet, DefaultFormatter, FieldValue, Formatter, Handler, JsonFormatter, LogContext,
        LogEntry, LogManager, LogProfiler, Logger, LoggerError, Result, Settings, Severity,
        TimestampFormat,
    };
    pub use crate::handlers::{ConsoleHandler, FileHandler, MemoryHandler};
}

pub use core::{
    process_memory, CategorySet, DatabaseInfo, DefaultFormatter, DispatchMetrics, EmailInfo,
    FieldValue, Formatter, FormatterSlot, Handler, HandlerRegistry, HandlerSnapshot,
    JsonFormatter, LogContext, LogEntry, LogManager, LogManagerBuilder, LogProfiler, Logger,
    LoggerError, Result, Settings, Severity, TimestampFormat,
};
pub use handlers::{
    handlers_from_settings, AsyncHandler, ConsoleHandler, DatabaseHandler, EmailHandler,
    FileHandler, MemoryHandler,
};
