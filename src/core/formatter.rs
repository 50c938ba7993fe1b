//! Entry formatters
//!
//! A [`Formatter`] turns an entry into display text. Implementations must be
//! total: any entry, including one with an empty message, renders without
//! panicking. Formatters hold no mutable state and are shared between
//! handlers and threads through `Arc<dyn Formatter>`.

use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use std::sync::Arc;

pub trait Formatter: Send + Sync {
    fn format(&self, entry: &LogEntry) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&LogEntry) -> String + Send + Sync,
{
    fn format(&self, entry: &LogEntry) -> String {
        self(entry)
    }
}

/// `HH:mm:ss.fff <SeverityInitial> <TypeName> <Message>`
///
/// # Example
///
/// ```
/// use rust_log_dispatch::core::{DefaultFormatter, Formatter, LogEntry, Severity};
///
/// let entry = LogEntry::new(Severity::Warn, "Orders", "stock low");
/// let line = DefaultFormatter::new().format(&entry);
/// assert!(line.ends_with(" W Orders stock low"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter {
    timestamp_format: TimestampFormat,
}

impl DefaultFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn shared() -> Arc<dyn Formatter> {
        Arc::new(Self::new())
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        format!(
            "{} {} {} {}",
            self.timestamp_format.format(&entry.date),
            entry.severity.initial(),
            entry.type_name,
            entry.message
        )
    }
}

/// One JSON object per entry, context fields flattened into the object
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601,
        }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "date".to_string(),
            serde_json::Value::String(self.timestamp_format.format(&entry.date)),
        );
        json_obj.insert(
            "severity".to_string(),
            serde_json::Value::String(entry.severity.name().to_string()),
        );
        json_obj.insert(
            "type".to_string(),
            serde_json::Value::String(entry.type_name.clone()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        if let Some(ref source) = entry.source {
            json_obj.insert(
                "source".to_string(),
                serde_json::Value::String(source.clone()),
            );
        }

        if let Some(ref context) = entry.context {
            for (key, value) in context.fields() {
                json_obj
                    .entry(key.clone())
                    .or_insert_with(|| value.to_json_value());
            }
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}
