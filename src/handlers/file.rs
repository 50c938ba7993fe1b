//! File handler implementation

use crate::core::{
    DefaultFormatter, Formatter, FormatterSlot, Handler, LogEntry, LoggerError, Result, Settings,
};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends one formatted line per entry to a file.
///
/// Each line is written with a single unbuffered `write_all`, so a `true`
/// result means the bytes reached the OS. With the `file` feature the write
/// also holds an exclusive advisory lock, letting several processes share
/// one log file.
pub struct FileHandler {
    path: PathBuf,
    file: Mutex<File>,
    formatter: FormatterSlot,
}

impl FileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    format!("cannot create '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            formatter: FormatterSlot::default(),
        })
    }

    /// File handler for `settings.file_name`, if one is configured
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        match settings.file_name {
            Some(ref path) => {
                let handler = Self::new(path)?.with_formatter(Arc::new(
                    DefaultFormatter::new().with_timestamp_format(settings.timestamp_format()),
                ));
                Ok(Some(handler))
            }
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn with_formatter(self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter.set(formatter);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_locked(&self, file: &mut File, bytes: &[u8]) -> Result<()> {
        #[cfg(feature = "file")]
        fs2::FileExt::lock_exclusive(&*file)
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;

        let result = file.write_all(bytes);

        #[cfg(feature = "file")]
        let _ = fs2::FileExt::unlock(&*file);

        result.map_err(|e| {
            LoggerError::file_handler(self.path.display().to_string(), e.to_string())
        })
    }
}

impl Handler for FileHandler {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = self.formatter.format(entry);
        line.push('\n');

        let mut file = self.file.lock();
        self.write_locked(&mut file, line.as_bytes())
    }

    fn flush(&self) -> Result<()> {
        self.file.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        self.formatter.get()
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        self.formatter.set(formatter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JsonFormatter, Severity};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lines_are_appended() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let handler = FileHandler::new(&path)?;

        assert!(handler.write(&LogEntry::new(Severity::Info, "Orders", "first")));
        assert!(handler.write(&LogEntry::new(Severity::Error, "Orders", "second\nline")));

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("I Orders first"));
        assert!(lines[1].ends_with("E Orders second\\nline"));
        Ok(())
    }

    #[test]
    fn test_reopen_appends() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("app.log");

        FileHandler::new(&path)?.append(&LogEntry::new(Severity::Info, "A", "one"))?;
        FileHandler::new(&path)?.append(&LogEntry::new(Severity::Info, "A", "two"))?;

        assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_formatter_replacement() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.jsonl");
        let handler = FileHandler::new(&path)?;
        handler.set_formatter(Arc::new(JsonFormatter::new()));

        handler.append(&LogEntry::new(Severity::Warn, "Orders", "json"))?;

        let content = fs::read_to_string(&path)?;
        let parsed: serde_json::Value = serde_json::from_str(content.trim())?;
        assert_eq!(parsed["message"], "json");
        Ok(())
    }

    #[test]
    fn test_from_settings() -> Result<()> {
        let dir = tempdir()?;
        assert!(FileHandler::from_settings(&Settings::default())?.is_none());

        let settings = Settings {
            file_name: Some(dir.path().join("configured.log")),
            date_time_format: Some("%Y".to_string()),
            ..Settings::default()
        };
        let handler = FileHandler::from_settings(&settings)?.expect("file handler");
        handler.append(&LogEntry::new(Severity::Info, "Orders", "x"))?;

        let content = fs::read_to_string(handler.path())?;
        assert!(content.starts_with(&chrono::Local::now().format("%Y ").to_string()));
        Ok(())
    }

    #[test]
    fn test_open_failure_is_error() {
        let dir = tempdir().expect("temp dir");
        // a directory cannot be opened for appending
        assert!(FileHandler::new(dir.path()).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_names_the_file() {
        // writes to /dev/full always fail with ENOSPC
        let Ok(handler) = FileHandler::new("/dev/full") else {
            return;
        };

        let err = handler
            .append(&LogEntry::new(Severity::Info, "Orders", "lost"))
            .unwrap_err();
        match err {
            LoggerError::FileHandlerError { ref path, .. } => assert_eq!(path, "/dev/full"),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!handler.write(&LogEntry::new(Severity::Info, "Orders", "lost")));
    }
}
