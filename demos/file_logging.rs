//! File logging example
//!
//! Builds handlers from a TOML settings document, writing to both the
//! console and a file, and shows JSON output on a second file.
//!
//! Run with: cargo run --example file_logging

use rust_log_dispatch::handlers_from_settings;
use rust_log_dispatch::prelude::*;
use std::sync::Arc;

const SETTINGS: &str = r#"
[Logging]
Severity = "Debug"
Types = "All"
Source = "file-demo"
DateTimeFormat = "%Y-%m-%d %H:%M:%S"
FileName = "application.log"
"#;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatch - File Logging Example ===\n");

    let settings = Settings::from_toml_str(SETTINGS)?;
    let manager = LogManager::with_handlers(settings.clone(), handlers_from_settings(&settings)?);

    println!("1. Logging to both console and file:");
    let logger = manager.get("App");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Adding a JSON lines file:");
    let json = FileHandler::new("application.jsonl")?.with_formatter(Arc::new(JsonFormatter::new()));
    manager.add_handler(Arc::new(json));

    for i in 1..=5 {
        logger.write_with_context(
            Severity::Info,
            format!("Processing item {}/5", i),
            LogContext::new().with_field("item", i as i64),
        );
    }

    manager.flush()?;

    println!("\n3. Log files created:");
    println!("   - application.log");
    println!("   - application.jsonl");
    println!("\n=== Example completed successfully ===");
    Ok(())
}
