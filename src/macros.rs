//! Logging macros with `format!`-style arguments.
//!
//! The arguments are passed as [`format_args!`], so the message is only
//! rendered when the entry passes the logger's filter.
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use rust_log_dispatch::info;
//!
//! let manager = LogManager::builder().handler(MemoryHandler::new()).build();
//! let logger = manager.get("Server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = LogManager::builder().build().get("Doc");
/// use rust_log_dispatch::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.write_args($severity, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let logger = LogManager::builder().build().get("Doc");
/// use rust_log_dispatch::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogManager, Severity};
    use crate::handlers::MemoryHandler;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn capture(severity: Severity) -> (LogManager, Arc<MemoryHandler>) {
        let memory = Arc::new(MemoryHandler::new());
        let manager = LogManager::builder()
            .severity(severity)
            .shared_handler(memory.clone())
            .build();
        (manager, memory)
    }

    #[test]
    fn test_severity_macros() {
        let (manager, memory) = capture(Severity::Trace);
        let logger = manager.get("Macros");

        trace!(logger, "t {}", 0);
        debug!(logger, "d {}", 1);
        info!(logger, "i {}", 2);
        warn!(logger, "w {}", 3);
        error!(logger, "e {}", 4);
        fatal!(logger, "f {}", 5);
        log!(logger, Severity::Info, "plain");

        assert_eq!(
            memory.messages(),
            vec!["t 0", "d 1", "i 2", "w 3", "e 4", "f 5", "plain"]
        );
        let severities: Vec<Severity> = memory.entries().iter().map(|e| e.severity).collect();
        assert_eq!(&severities[..6], &Severity::ALL[..]);
    }

    struct Counted<'a>(&'a AtomicUsize);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            write!(f, "rendered")
        }
    }

    #[test]
    fn test_filtered_arguments_are_not_rendered() {
        let (manager, memory) = capture(Severity::Warn);
        let logger = manager.get("Macros");
        let renders = AtomicUsize::new(0);

        debug!(logger, "{}", Counted(&renders));
        assert_eq!(renders.load(Ordering::SeqCst), 0);

        error!(logger, "{}", Counted(&renders));
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(memory.messages(), vec!["rendered"]);
    }
}
