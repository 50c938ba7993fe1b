//! Timestamp formatting
//!
//! Entry timestamps are local wall-clock times. The default rendering is the
//! time of day with milliseconds (`14:03:27.512`); the other variants cover
//! sinks that need a full date or a numeric timestamp.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const TIME_OF_DAY: &str = "%H:%M:%S%.3f";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Time of day with milliseconds: `14:03:27.512`
    #[default]
    TimeOfDay,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T14:03:27.512+01:00`
    Iso8601,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Validated strftime format, see [`TimestampFormat::custom`]
    Custom(String),
}

impl TimestampFormat {
    /// Build a custom strftime format, rejecting unknown specifiers
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_log_dispatch::core::TimestampFormat;
    ///
    /// assert!(TimestampFormat::custom("%Y/%m/%d %H:%M").is_ok());
    /// assert!(TimestampFormat::custom("%Q").is_err());
    /// ```
    pub fn custom(format: &str) -> Result<Self> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "DateTimeFormat",
                format!("invalid strftime format '{}'", format),
            ));
        }
        Ok(TimestampFormat::Custom(format.to_string()))
    }

    /// Render `datetime`; never panics, even for a malformed custom format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::TimeOfDay => datetime.format(TIME_OF_DAY).to_string(),
            TimestampFormat::Iso8601 => datetime.to_rfc3339_opts(SecondsFormat::Millis, false),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    out.clear();
                    out.push_str(&datetime.format(TIME_OF_DAY).to_string());
                }
                out
            }
        }
    }
}
