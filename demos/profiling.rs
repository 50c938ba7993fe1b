//! Profiler span example
//!
//! Times a few scopes and prints the START / tick / FINISH entries with
//! their elapsed time and memory delta fields.
//!
//! Run with: cargo run --example profiling

use rust_log_dispatch::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatch - Profiling Example ===\n");

    let memory = Arc::new(MemoryHandler::new());
    let manager = LogManager::builder()
        .severity(Severity::Debug)
        .handler(ConsoleHandler::new())
        .shared_handler(memory.clone())
        .build();
    let logger = manager.get("Import");

    println!("1. Explicit span:");
    {
        let span = logger.profiler("load-customers");
        thread::sleep(Duration::from_millis(50));
        let buffer: Vec<u8> = vec![0; 4 * 1024 * 1024];
        span.info(format!("allocated {} bytes", buffer.len()));
        thread::sleep(Duration::from_millis(50));
        span.dispose();
        println!("   elapsed: {:?}", span.elapsed());
    }

    println!("\n2. Scoped helper:");
    let rows = logger.profile("parse-orders", |span| {
        let rows = (0..10_000).filter(|n| n % 7 == 0).count();
        span.debug(format!("parsed {} rows", rows));
        rows
    });
    println!("   rows: {}", rows);

    println!("\n3. Captured profiler fields:");
    for entry in memory.entries() {
        if let Some(context) = entry.context {
            println!("   {:<40} {}", entry.message, context.format_fields());
        }
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
