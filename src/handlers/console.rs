//! Console handler implementation

use crate::core::{Formatter, FormatterSlot, Handler, LogEntry, Result, Severity};
use std::io::Write;
use std::sync::Arc;

/// Writes formatted entries to stdout, routing Error and Fatal to stderr
pub struct ConsoleHandler {
    use_colors: bool,
    formatter: FormatterSlot,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            formatter: FormatterSlot::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Replace the formatter
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::handlers::ConsoleHandler;
    /// use rust_log_dispatch::JsonFormatter;
    /// use std::sync::Arc;
    ///
    /// let handler = ConsoleHandler::new().with_formatter(Arc::new(JsonFormatter::new()));
    /// ```
    #[must_use]
    pub fn with_formatter(self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter.set(formatter);
        self
    }

    fn render(&self, entry: &LogEntry) -> String {
        let line = self.formatter.format(entry);
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                use colored::Colorize;
                return line.color(entry.severity.color_code()).to_string();
            }
        }
        #[cfg(not(feature = "console"))]
        let _ = (self.use_colors, &entry.severity);
        line
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = self.render(entry);
        line.push('\n');

        match entry.severity {
            Severity::Error | Severity::Fatal => {
                std::io::stderr().lock().write_all(line.as_bytes())?
            }
            _ => std::io::stdout().lock().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.get()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter.set(formatter);
    }
}
