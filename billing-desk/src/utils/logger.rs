//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level. Console output goes to stderr
//! so it does not interleave with the till screen on stdout.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the logger
pub fn init_logger() -> Option<WorkerGuard> {
    init_logger_with_file(None, None)
}

/// Initialize the logger with optional daily-rolling file output
///
/// Keep the returned guard alive for as long as file logging is wanted;
/// dropping it flushes and stops the background writer.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_target(false)
        .with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(log_path) {
            eprintln!("Failed to create log directory {}: {}", dir, e);
            return None;
        }
        let file_appender = tracing_appender::rolling::daily(log_path, "billing-desk.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);
        Some(
            fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_writer(non_blocking),
        )
    });

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }

    guard
}
