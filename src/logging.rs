use log::{info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate, honouring `RUST_LOG`.
pub fn init_logger() {
    env_logger::init();
}

/// Initializes `env_logger` with a default filter; `RUST_LOG` still wins
/// when it is set.
///
/// # Examples
/// ```rust,no_run
/// use p1_rs::logging::init_logger_with_level;
///
/// init_logger_with_level("debug");
/// log::debug!("Logger configured");
/// ```
pub fn init_logger_with_level(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
