//! SQLite-backed [`SqlExecutor`]

use super::database::{SqlCommand, SqlExecutor, SqlValue};
use crate::core::{DatabaseInfo, LoggerError, Result};
use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::Path;

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Text(text) => ToSqlOutput::from(text.as_str()),
            SqlValue::Integer(value) => ToSqlOutput::from(*value),
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// Runs commands on a single SQLite connection
pub struct SqliteExecutor {
    connection: Mutex<Connection>,
}

impl SqliteExecutor {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|e| {
            LoggerError::sql(format!("open {}", path.display()), e.to_string())
        })?;
        Ok(Self::from_connection(connection))
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()
            .map_err(|e| LoggerError::sql("open :memory:", e.to_string()))?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    /// Create the log table described by `info` if it does not exist yet
    pub fn ensure_table(&self, info: &DatabaseInfo) -> Result<()> {
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} ({} TEXT NOT NULL, {} TEXT NOT NULL, {} TEXT NOT NULL, {} TEXT NOT NULL)",
            info.table_name,
            info.severity_column,
            info.type_column,
            info.message_column,
            info.date_column
        );
        self.connection
            .lock()
            .execute_batch(&statement)
            .map_err(|e| LoggerError::sql(statement.as_str(), e.to_string()))
    }

    /// Run a closure against the underlying connection
    pub fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> R) -> R {
        f(&self.connection.lock())
    }
}

impl SqlExecutor for SqliteExecutor {
    fn execute_non_query(&self, command: &SqlCommand) -> Result<u64> {
        self.connection
            .lock()
            .execute(&command.text, params_from_iter(command.params.iter()))
            .map(|rows| rows as u64)
            .map_err(|e| LoggerError::sql(command.text.as_str(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Handler, LogEntry, Severity};
    use crate::handlers::DatabaseHandler;
    use std::sync::Arc;

    fn count_rows(executor: &SqliteExecutor) -> i64 {
        executor.with_connection(|c| {
            c.query_row("SELECT COUNT(*) FROM EventLog", [], |row| row.get(0))
                .expect("count rows")
        })
    }

    #[test]
    fn test_batched_rows_land_in_table() -> Result<()> {
        let executor = Arc::new(SqliteExecutor::open_in_memory()?);
        executor.ensure_table(&DatabaseInfo::default())?;
        let handler = DatabaseHandler::new(executor.clone(), DatabaseInfo::default(), 2);

        handler.append(&LogEntry::new(Severity::Error, "Billing", "charge failed"))?;
        assert_eq!(count_rows(&executor), 0);
        handler.append(&LogEntry::new(Severity::Info, "Billing", "retry queued"))?;
        assert_eq!(count_rows(&executor), 2);

        let first: (String, String, String) = executor.with_connection(|c| {
            c.query_row(
                "SELECT Severity, Type, Message FROM EventLog ORDER BY rowid LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .expect("first row")
        });
        assert_eq!(
            first,
            (
                "Error".to_string(),
                "Billing".to_string(),
                "charge failed".to_string()
            )
        );
        Ok(())
    }

    #[test]
    fn test_missing_table_is_sql_error() -> Result<()> {
        let executor = SqliteExecutor::open_in_memory()?;
        let command = SqlCommand::new("INSERT INTO Missing (A) VALUES (?1)").param("x");
        let err = executor.execute_non_query(&command).unwrap_err();
        assert!(matches!(err, LoggerError::SqlError { .. }));
        Ok(())
    }

    #[test]
    fn test_null_and_integer_params() -> Result<()> {
        let executor = SqliteExecutor::open_in_memory()?;
        executor.with_connection(|c| c.execute_batch("CREATE TABLE T (A INTEGER, B TEXT)"))
            .map_err(|e| LoggerError::other(e.to_string()))?;
        let command = SqlCommand::new("INSERT INTO T (A, B) VALUES (?1, ?2)")
            .param(7i64)
            .param(SqlValue::Null);
        assert_eq!(executor.execute_non_query(&command)?, 1);
        Ok(())
    }
}
