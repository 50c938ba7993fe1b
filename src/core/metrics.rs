//! Dispatch metrics for observability
//!
//! Counters for the filter decision and handler outcomes. All counters are
//! relaxed atomics; they are diagnostics, not synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_log_dispatch::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_handler_failure();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.handler_failures(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Entries that passed the filter and were handed to the registry
    dispatched: AtomicU64,

    /// Calls rejected by the severity or category filter
    filtered: AtomicU64,

    /// Handler writes that returned `false` or panicked
    handler_failures: AtomicU64,

    /// Handler panics caught during dispatch
    handler_panics: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
            handler_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_panics(&self) -> u64 {
        self.handler_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_panic(&self) -> u64 {
        self.handler_panics.fetch_add(1, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
        self.handler_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            filtered: AtomicU64::new(self.filtered()),
            handler_failures: AtomicU64::new(self.handler_failures()),
            handler_panics: AtomicU64::new(self.handler_panics()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.record_filtered(), 0);
        assert_eq!(metrics.record_filtered(), 1);
        assert_eq!(metrics.filtered(), 2);
    }

    #[test]
    fn test_reset() {
        let metrics = DispatchMetrics::new();
        metrics.record_dispatched();
        metrics.record_handler_panic();
        metrics.reset();
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.handler_panics(), 0);
    }

    #[test]
    fn test_clone_is_snapshot() {
        let metrics = DispatchMetrics::new();
        metrics.record_dispatched();
        let snapshot = metrics.clone();
        metrics.record_dispatched();
        assert_eq!(snapshot.dispatched(), 1);
        assert_eq!(metrics.dispatched(), 2);
    }
}
