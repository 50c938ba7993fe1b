//! Email handler implementation

use crate::core::{
    EmailInfo, Formatter, FormatterSlot, Handler, LogEntry, LoggerError, Result, Settings,
};
use chrono::Local;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// RFC 5322 rendering with CRLF line endings
    pub fn to_rfc5322(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.from,
            self.to,
            self.subject,
            Local::now().to_rfc2822(),
            self.body
        )
    }
}

/// Delivers composed messages. Implementations bound their own send time.
pub trait EmailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Drops each message as an `.eml` file into a directory for a mail
/// server's pickup service
#[derive(Debug, Clone)]
pub struct PickupDirectoryTransport {
    directory: PathBuf,
}

impl PickupDirectoryTransport {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| {
            LoggerError::io_operation(
                "creating pickup directory",
                format!("cannot create '{}'", directory.display()),
                e,
            )
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl EmailTransport for PickupDirectoryTransport {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let path = self.directory.join(format!("{}.eml", Uuid::new_v4()));
        fs::write(&path, message.to_rfc5322())
            .map_err(|e| LoggerError::email(message.to.as_str(), e.to_string()))
    }
}

/// Mails entries at or above the configured severity
///
/// With an empty sender or recipient the handler is inert: every write
/// succeeds and nothing is sent.
pub struct EmailHandler {
    info: EmailInfo,
    transport: Arc<dyn EmailTransport>,
    formatter: FormatterSlot,
}

impl EmailHandler {
    pub fn new(transport: Arc<dyn EmailTransport>, info: EmailInfo) -> Self {
        Self {
            info,
            transport,
            formatter: FormatterSlot::default(),
        }
    }

    pub fn from_settings(transport: Arc<dyn EmailTransport>, settings: &Settings) -> Self {
        Self::new(transport, settings.email.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.info.from.trim().is_empty() || self.info.to.trim().is_empty()
    }

    pub fn info(&self) -> &EmailInfo {
        &self.info
    }

    fn compose(&self, entry: &LogEntry) -> EmailMessage {
        EmailMessage {
            from: self.info.from.clone(),
            to: self.info.to.clone(),
            subject: self.info.subject.clone(),
            body: self.formatter.format(entry),
        }
    }
}

impl Handler for EmailHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        if self.is_empty() || entry.severity < self.info.severity {
            return Ok(());
        }
        self.transport.send(&self.compose(entry))
    }

    fn name(&self) -> &str {
        "email"
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.get()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter.set(formatter);
    }
}

impl fmt::Debug for EmailHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailHandler")
            .field("info", &self.info)
            .field("inert", &self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use parking_lot::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl EmailTransport for Outbox {
        fn send(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().push(message.clone());
            Ok(())
        }
    }

    struct Unreachable;

    impl EmailTransport for Unreachable {
        fn send(&self, message: &EmailMessage) -> Result<()> {
            Err(LoggerError::email(message.to.as_str(), "relay unreachable"))
        }
    }

    fn configured() -> EmailInfo {
        EmailInfo {
            to: "ops@example.com".to_string(),
            ..EmailInfo::for_product("shop")
        }
    }

    #[test]
    fn test_inert_without_recipient() {
        let outbox = Arc::new(Outbox::default());
        let handler = EmailHandler::new(outbox.clone(), EmailInfo::default());
        assert!(handler.is_empty());
        assert!(handler.write(&LogEntry::new(Severity::Fatal, "Orders", "boom")));
        assert!(outbox.sent.lock().is_empty());
    }

    #[test]
    fn test_sends_at_or_above_threshold() {
        let outbox = Arc::new(Outbox::default());
        let handler = EmailHandler::new(outbox.clone(), configured());
        assert!(!handler.is_empty());

        assert!(handler.write(&LogEntry::new(Severity::Warn, "Orders", "ignored")));
        assert!(handler.write(&LogEntry::new(Severity::Error, "Orders", "payment failed")));

        let sent = outbox.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "errors@shop");
        assert_eq!(sent[0].to, "ops@example.com");
        assert_eq!(sent[0].subject, "shop error");
        assert!(sent[0].body.ends_with("E Orders payment failed"));
    }

    #[test]
    fn test_transport_failure_is_false() {
        let handler = EmailHandler::new(Arc::new(Unreachable), configured());
        assert!(!handler.write(&LogEntry::new(Severity::Error, "Orders", "lost")));
    }

    #[test]
    fn test_pickup_directory_writes_eml() -> Result<()> {
        let dir = tempdir()?;
        let transport = Arc::new(PickupDirectoryTransport::new(dir.path().join("pickup"))?);
        let handler = EmailHandler::new(transport.clone(), configured());

        handler.append(&LogEntry::new(Severity::Fatal, "Orders", "database gone"))?;

        let files: Vec<_> = fs::read_dir(transport.directory())?.collect::<std::io::Result<_>>()?;
        assert_eq!(files.len(), 1);
        let content = fs::read_to_string(files[0].path())?;
        assert!(content.starts_with("From: errors@shop\r\nTo: ops@example.com\r\n"));
        assert!(content.contains("Subject: shop error\r\n"));
        assert!(content.contains("F Orders database gone"));
        Ok(())
    }
}
