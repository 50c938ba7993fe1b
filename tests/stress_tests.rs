//! Stress tests for concurrent dispatch
//!
//! These tests verify:
//! - No entries are lost when many threads share one manager
//! - Per-thread ordering is preserved at every handler
//! - Profiler UIDs stay unique under sequential and concurrent creation
//! - Concurrent writers never trigger overlapping database batches
//! - Settings and handler swaps are safe while writers are running

use rust_log_dispatch::handlers::{AsyncHandler, DatabaseHandler, SqlCommand, SqlExecutor, SqlValue};
use rust_log_dispatch::prelude::*;
use rust_log_dispatch::DatabaseInfo;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn debug_manager(handler: Arc<dyn Handler>) -> LogManager {
    LogManager::builder()
        .severity(Severity::Debug)
        .shared_handler(handler)
        .build()
}

/// Splits "t<thread>-<seq>" messages and checks each thread's sequence is increasing
fn assert_per_thread_order(messages: &[String]) {
    let mut last: HashMap<usize, usize> = HashMap::new();
    for message in messages {
        let (thread_part, seq_part) = message
            .trim_start_matches('t')
            .split_once('-')
            .expect("message shape");
        let thread: usize = thread_part.parse().expect("thread id");
        let seq: usize = seq_part.parse().expect("sequence");
        if let Some(prev) = last.insert(thread, seq) {
            assert!(seq > prev, "thread {} went from {} to {}", thread, prev, seq);
        }
    }
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let memory = Arc::new(MemoryHandler::new());
    let manager = debug_manager(memory.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = manager.get("Stress");
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(format!("t{}-{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    let messages = memory.messages();
    assert_eq!(messages.len(), THREADS * PER_THREAD);
    assert_per_thread_order(&messages);
    assert_eq!(manager.metrics().dispatched(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_async_handler_preserves_per_thread_order() {
    let memory = Arc::new(MemoryHandler::new());
    let async_handler = Arc::new(AsyncHandler::with_capacity(memory.clone(), 16));
    let manager = debug_manager(async_handler.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = manager.get("Stress");
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(format!("t{}-{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }
    manager.flush().expect("flush");

    let messages = memory.messages();
    assert_eq!(messages.len(), THREADS * PER_THREAD);
    assert_per_thread_order(&messages);
}

#[test]
fn test_file_handler_lines_stay_whole() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let file = Arc::new(FileHandler::new(&log_file).expect("file handler"));
    let manager = debug_manager(file);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = manager.get("Stress");
            thread::spawn(move || {
                for i in 0..200 {
                    logger.info(format!("t{}-{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    let content = fs::read_to_string(&log_file).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * 200);
    assert!(lines.iter().all(|l| l.contains(" I Stress t")));
}

#[test]
fn test_sequential_profiler_uids_are_unique() {
    let manager = debug_manager(Arc::new(MemoryHandler::new()));
    let logger = manager.get("Uids");

    let uids: HashSet<_> = (0..2_000).map(|_| logger.profiler("seq").uid()).collect();
    assert_eq!(uids.len(), 2_000);
}

#[test]
fn test_concurrent_profiler_uids_are_unique() {
    let manager = LogManager::builder().severity(Severity::Info).build();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = manager.get("Uids");
            thread::spawn(move || {
                (0..250)
                    .map(|_| logger.profiler("par").uid())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut uids = HashSet::new();
    for handle in handles {
        for uid in handle.join().expect("profiler thread") {
            assert!(uids.insert(uid), "duplicate uid {}", uid);
        }
    }
    assert_eq!(uids.len(), THREADS * 250);
}

/// Fails the test if two flushes ever execute at the same time
#[derive(Default)]
struct ExclusiveExecutor {
    in_flight: AtomicBool,
    overlaps: AtomicUsize,
    rows: Mutex<Vec<String>>,
}

impl SqlExecutor for ExclusiveExecutor {
    fn execute_non_query(&self, command: &SqlCommand) -> Result<u64> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if let SqlValue::Text(ref message) = command.params[2] {
            self.rows.lock().unwrap().push(message.clone());
        }
        thread::yield_now();
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(1)
    }
}

#[test]
fn test_concurrent_database_batches_never_overlap() {
    let executor = Arc::new(ExclusiveExecutor::default());
    let database = Arc::new(DatabaseHandler::new(
        executor.clone(),
        DatabaseInfo::default(),
        7,
    ));
    let manager = debug_manager(database.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = manager.get("Batch");
            thread::spawn(move || {
                for i in 0..100 {
                    logger.info(format!("t{}-{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }
    database.flush().expect("final flush");

    let rows = executor.rows.lock().unwrap().clone();
    assert_eq!(executor.overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(rows.len(), THREADS * 100);
    assert_eq!(rows.iter().collect::<HashSet<_>>().len(), rows.len());
    assert_per_thread_order(&rows);
}

#[test]
fn test_reconfigure_while_writing() {
    let memory = Arc::new(MemoryHandler::new());
    let manager = debug_manager(memory.clone());
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let logger = manager.get("Churn");
            let stop = stop.clone();
            thread::spawn(move || {
                let mut i = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    logger.warn(format!("t{}-{}", t, i));
                    i += 1;
                }
            })
        })
        .collect();

    for round in 0..200 {
        let severity = if round % 2 == 0 { Severity::Error } else { Severity::Debug };
        manager.update_settings(|s| s.severity = severity);
        if round % 10 == 0 {
            manager.set_handlers(vec![memory.clone() as Arc<dyn Handler>]);
        }
    }
    stop.store(true, Ordering::Relaxed);
    for writer in writers {
        writer.join().expect("writer thread");
    }

    assert_per_thread_order(&memory.messages());
}
