use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    // Daily-rotated JSON log file, non-blocking writer
    let file_appender = tracing_appender::rolling::daily("logs", "rave-radar.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("rave_radar=info".parse().unwrap()))
        .with(file_layer)
        .with(console_layer)
        .init();

    // Keep the guard alive for the process lifetime so logs flush on exit
    std::mem::forget(guard);
}
