//! Dispatch configuration
//!
//! [`Settings`] is a plain value: build it in code, or load it from a TOML or
//! JSON document whose `Logging` section carries the keys below. A
//! [`LogManager`](super::LogManager) owns the active instance; nothing here is
//! global.
//!
//! ```toml
//! [Logging]
//! Severity = "Warn"
//! Types = ["Orders", "Billing"]   # or "Orders, Billing", or "All"
//! Source = "api"
//! DateTimeFormat = "%H:%M:%S%.3f"
//! BatchSize = 20
//! FlushIntervalMs = 5000
//! FileName = "app.log"
//! Product = "shop"
//!
//! [Logging.DatabaseInfo]
//! TableName = "EventLog"
//!
//! [Logging.EmailInfo]
//! To = "ops@example.com"
//! ```

use super::category::CategorySet;
use super::error::{LoggerError, Result};
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section name holding the dispatch settings in a configuration document
pub const SECTION: &str = "Logging";

/// Environment variable naming the settings file read by [`Settings::from_env`]
pub const CONFIG_ENV_VAR: &str = "LOG_DISPATCH_CONFIG";

const DEFAULT_PRODUCT: &str = "application";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub table_name: String,
    pub severity_column: String,
    pub date_column: String,
    pub type_column: String,
    pub message_column: String,
}

impl Default for DatabaseInfo {
    fn default() -> Self {
        Self {
            table_name: "EventLog".to_string(),
            severity_column: "Severity".to_string(),
            date_column: "Date".to_string(),
            type_column: "Type".to_string(),
            message_column: "Message".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailInfo {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Lowest severity that triggers a message
    pub severity: Severity,
}

impl EmailInfo {
    pub fn for_product(product: &str) -> Self {
        Self {
            from: format!("errors@{}", product),
            to: String::new(),
            subject: format!("{} error", product),
            severity: Severity::Error,
        }
    }
}

impl Default for EmailInfo {
    fn default() -> Self {
        Self::for_product(DEFAULT_PRODUCT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Minimum severity dispatched
    pub severity: Severity,
    pub types: CategorySet,
    pub source: Option<String>,
    /// strftime format for entry timestamps; `None` keeps `HH:mm:ss.fff`
    pub date_time_format: Option<String>,
    /// Entries buffered by the database handler before a flush; 0 writes immediately
    pub batch_size: usize,
    /// Timer flush for partially filled database batches
    pub flush_interval: Option<Duration>,
    pub file_name: Option<PathBuf>,
    pub product: String,
    pub database: DatabaseInfo,
    pub email: EmailInfo,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            severity: Severity::Info,
            types: CategorySet::All,
            source: None,
            date_time_format: None,
            batch_size: 0,
            flush_interval: None,
            file_name: None,
            product: DEFAULT_PRODUCT.to_string(),
            database: DatabaseInfo::default(),
            email: EmailInfo::default(),
        }
    }
}

impl Settings {
    /// Parse the `Logging` section of a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let document: RawDocument = toml::from_str(text)?;
        document.logging.unwrap_or_default().resolve()
    }

    /// Parse the `Logging` section of a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: RawDocument = serde_json::from_str(text)?;
        document.logging.unwrap_or_default().resolve()
    }

    /// Load a settings file; `.json` files are parsed as JSON, anything else as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading settings",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// Timestamp rendering derived from `date_time_format`
    pub fn timestamp_format(&self) -> TimestampFormat {
        match self.date_time_format {
            Some(ref format) => TimestampFormat::custom(format).unwrap_or_default(),
            None => TimestampFormat::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(rename = "Logging")]
    logging: Option<RawSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTypes {
    List(Vec<String>),
    Text(String),
}

impl RawTypes {
    fn into_set(self) -> CategorySet {
        match self {
            RawTypes::List(names) => CategorySet::only(names),
            RawTypes::Text(text) => CategorySet::only(text.split([',', '|'])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDatabaseInfo {
    table_name: Option<String>,
    severity_column: Option<String>,
    date_column: Option<String>,
    type_column: Option<String>,
    message_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEmailInfo {
    from: Option<String>,
    to: Option<String>,
    subject: Option<String>,
    severity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSettings {
    severity: Option<String>,
    types: Option<RawTypes>,
    /// Legacy key, consulted only when `Types` is absent
    #[serde(rename = "Type")]
    legacy_type: Option<RawTypes>,
    source: Option<String>,
    date_time_format: Option<String>,
    batch_size: Option<i64>,
    flush_interval_ms: Option<u64>,
    file_name: Option<PathBuf>,
    product: Option<String>,
    database_info: Option<RawDatabaseInfo>,
    email_info: Option<RawEmailInfo>,
}

fn parse_severity(key: &str, value: &str) -> Result<Severity> {
    value
        .parse()
        .map_err(|e: String| LoggerError::config(format!("{}.{}", SECTION, key), e))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawSettings {
    fn resolve(self) -> Result<Settings> {
        let defaults = Settings::default();

        let severity = match self.severity {
            Some(ref value) => parse_severity("Severity", value)?,
            None => defaults.severity,
        };

        let types = match (self.types, self.legacy_type) {
            (Some(types), _) => types.into_set(),
            (None, Some(legacy)) => legacy.into_set(),
            (None, None) => defaults.types,
        };

        let date_time_format = non_empty(self.date_time_format);
        if let Some(ref format) = date_time_format {
            TimestampFormat::custom(format)?;
        }

        let batch_size = match self.batch_size {
            Some(n) if n < 0 => {
                return Err(LoggerError::config(
                    format!("{}.BatchSize", SECTION),
                    format!("must be non-negative, got {}", n),
                ))
            }
            Some(n) => n as usize,
            None => defaults.batch_size,
        };

        let flush_interval = self
            .flush_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let product = non_empty(self.product).unwrap_or(defaults.product);

        let db = self.database_info.unwrap_or_default();
        let db_defaults = DatabaseInfo::default();
        let database = DatabaseInfo {
            table_name: non_empty(db.table_name).unwrap_or(db_defaults.table_name),
            severity_column: non_empty(db.severity_column).unwrap_or(db_defaults.severity_column),
            date_column: non_empty(db.date_column).unwrap_or(db_defaults.date_column),
            type_column: non_empty(db.type_column).unwrap_or(db_defaults.type_column),
            message_column: non_empty(db.message_column).unwrap_or(db_defaults.message_column),
        };

        let mail = self.email_info.unwrap_or_default();
        let mail_defaults = EmailInfo::for_product(&product);
        let email = EmailInfo {
            from: non_empty(mail.from).unwrap_or(mail_defaults.from),
            to: mail.to.unwrap_or_default().trim().to_string(),
            subject: non_empty(mail.subject).unwrap_or(mail_defaults.subject),
            severity: match mail.severity {
                Some(ref value) => parse_severity("EmailInfo.Severity", value)?,
                None => mail_defaults.severity,
            },
        };

        Ok(Settings {
            severity,
            types,
            source: non_empty(self.source),
            date_time_format,
            batch_size,
            flush_interval,
            file_name: self.file_name.filter(|p| !p.as_os_str().is_empty()),
            product,
            database,
            email,
        })
    }
}
