//! Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//!
//! Logs go to stderr: stdout is reserved for the serialized transaction or
//! payload the scripts print.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;

pub fn setup_logging() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let level_filter = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    if let Err(e) = TermLogger::init(
        level_filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}
