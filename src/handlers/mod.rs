//! Handler implementations

pub mod async_handler;
pub mod console;
pub mod database;
pub mod email;
pub mod file;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use async_handler::AsyncHandler;
pub use console::ConsoleHandler;
pub use database::{
    insert_statement, DatabaseHandler, SqlCommand, SqlExecutor, SqlValue, MIN_FLUSH_INTERVAL,
};
pub use email::{EmailHandler, EmailMessage, EmailTransport, PickupDirectoryTransport};
pub use file::FileHandler;
pub use memory::MemoryHandler;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;

use crate::core::{DefaultFormatter, Handler, Result, Settings};
use std::sync::Arc;

/// The handlers a settings document describes on its own: a console handler,
/// plus a file handler when `FileName` is set.
///
/// Database and email handlers need an executor or transport and are built
/// with [`DatabaseHandler::from_settings`] and [`EmailHandler::from_settings`].
pub fn handlers_from_settings(settings: &Settings) -> Result<Vec<Arc<dyn Handler>>> {
    let console = ConsoleHandler::new().with_formatter(Arc::new(
        DefaultFormatter::new().with_timestamp_format(settings.timestamp_format()),
    ));
    let mut handlers: Vec<Arc<dyn Handler>> = vec![Arc::new(console)];

    if let Some(file) = FileHandler::from_settings(settings)? {
        handlers.push(Arc::new(file));
    }
    Ok(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_console_only_by_default() -> Result<()> {
        let handlers = handlers_from_settings(&Settings::default())?;
        let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["console"]);
        Ok(())
    }

    #[test]
    fn test_file_handler_when_configured() -> Result<()> {
        let dir = tempdir()?;
        let settings = Settings {
            file_name: Some(dir.path().join("app.log")),
            ..Settings::default()
        };
        let handlers = handlers_from_settings(&settings)?;
        let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["console", "file"]);
        Ok(())
    }
}
