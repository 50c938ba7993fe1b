//! Best-effort diagnostic channel for failures inside the logging core
//!
//! Everything here writes straight to stderr. It must never route through a
//! [`Logger`](super::Logger), otherwise a failing handler could recurse into
//! dispatch.

use super::error::LoggerError;
use std::any::Any;
use std::io::Write;

fn emit(prefix: &str, args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut lock = stderr.lock();
    let _ = writeln!(lock, "[{}] {}", prefix, args);
}

pub(crate) fn error(args: std::fmt::Arguments<'_>) {
    emit("LOGGER ERROR", args);
}

pub(crate) fn warning(args: std::fmt::Arguments<'_>) {
    emit("LOGGER WARNING", args);
}

pub(crate) fn critical(args: std::fmt::Arguments<'_>) {
    emit("LOGGER CRITICAL", args);
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Turn a panic caught around `handler` into an error value
pub(crate) fn handler_panic(handler: &str, payload: &(dyn Any + Send)) -> LoggerError {
    LoggerError::handler_panicked(handler, panic_message(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 7");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }

    #[test]
    fn test_handler_panic_keeps_name_and_message() {
        let payload = std::panic::catch_unwind(|| panic!("disk gone")).unwrap_err();
        let err = handler_panic("file", payload.as_ref());
        assert!(matches!(
            err,
            LoggerError::HandlerPanicked { ref handler, ref message }
                if handler == "file" && message == "disk gone"
        ));
        assert_eq!(err.to_string(), "Handler 'file' panicked: disk gone");
    }
}
