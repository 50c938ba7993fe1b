//! Log entry structure

use super::log_context::LogContext;
use super::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One log event. Built once by a [`Logger`](super::Logger) and handed to
/// every handler by reference; never mutated after dispatch starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: DateTime<Local>,
    pub severity: Severity,
    pub type_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<LogContext>,
}

impl LogEntry {
    /// Escape newlines, carriage returns and tabs so an entry always renders
    /// as a single line and cannot forge additional entries in line sinks.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(severity: Severity, type_name: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            date: Local::now(),
            severity,
            type_name: type_name.into(),
            message: Self::sanitize_message(message.as_ref()),
            source: None,
            context: None,
        }
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Override the creation time
    pub fn at(mut self, date: DateTime<Local>) -> Self {
        self.date = date;
        self
    }
}
