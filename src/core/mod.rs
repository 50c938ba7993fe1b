//! Core dispatch types and traits

pub mod category;
pub(crate) mod diagnostics;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_context;
pub mod log_entry;
pub mod logger;
pub mod manager;
pub mod metrics;
pub mod profiler;
pub mod registry;
pub mod settings;
pub mod severity;
pub mod timestamp;

pub use category::CategorySet;
pub use error::{LoggerError, Result};
pub use formatter::{DefaultFormatter, Formatter, JsonFormatter};
pub use handler::{FormatterSlot, Handler};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use logger::Logger;
pub use manager::{LogManager, LogManagerBuilder};
pub use metrics::DispatchMetrics;
pub use profiler::{process_memory, LogProfiler};
pub use registry::{HandlerRegistry, HandlerSnapshot};
pub use settings::{DatabaseInfo, EmailInfo, Settings};
pub use severity::Severity;
pub use timestamp::TimestampFormat;
