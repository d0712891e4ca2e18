//! # Utility Modules
//!
//! Logging helpers shared by the reader loop and the binary.

pub mod logging;

pub use logging::{log_telegram, LogThrottle};
