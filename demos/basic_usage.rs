//! Basic dispatch usage example
//!
//! Demonstrates category loggers, severity filtering and runtime
//! reconfiguration with a console handler.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatch::prelude::*;
use rust_log_dispatch::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Log Dispatch - Basic Usage Example ===\n");

    let manager = LogManager::builder()
        .severity(Severity::Trace)
        .handler(ConsoleHandler::new())
        .build();

    println!("1. Logging at different severities:");
    let logger = manager.get("Orders");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");

    println!("\n2. Raising the threshold to Warn at runtime:");
    manager.update_settings(|s| s.severity = Severity::Warn);
    logger.info("This info message is filtered");
    logger.warn("This warning still gets through");

    println!("\n3. Restricting categories:");
    manager.update_settings(|s| {
        s.severity = Severity::Info;
        s.types = CategorySet::only(["Billing"]);
    });
    manager.get("Billing").info("Billing is enabled");
    manager.get("Shipping").info("Shipping is not");

    println!("\n4. Formatting macros:");
    manager.update_settings(|s| s.types = CategorySet::All);
    let order_id = 1042;
    info!(logger, "Order {} accepted", order_id);
    warn!(logger, "Order {} is waiting on stock ({} items)", order_id, 3);

    println!("\n5. Dispatch metrics:");
    let metrics = manager.metrics();
    println!(
        "   dispatched={} filtered={} failures={}",
        metrics.dispatched(),
        metrics.filtered(),
        metrics.handler_failures()
    );

    manager.flush()?;
    println!("\n=== Example completed successfully ===");
    Ok(())
}
