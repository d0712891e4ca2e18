//! # p1-rs - A Rust Crate for DSMR P1 Smart Meter Telegrams
//!
//! Smart meters following the DSMR P1 companion standard emit a plain ASCII
//! "telegram" over their P1 serial port every 1 to 10 seconds. This crate
//! frames those telegrams out of the line stream, verifies their CRC-16
//! checksum, and decodes the electricity fields into typed measures.
//!
//! ## Features
//!
//! - Frame a telegram from any blocking or async line source
//! - Reject corrupted telegrams by their CRC-16/ARC checksum
//! - Decode energy totals, power, tariff, voltage event and current fields
//! - Distinct, inspectable errors for framing, checksum, field and transport failures
//! - Serial port adapter, YAML configuration and JSON lines output for the `p1-reader` binary
//!
//! ## Usage
//!
//! ```rust
//! use p1_rs::{acquire, MeasureValue, MockLineSource};
//!
//! let source = MockLineSource::from_text(
//!     "/ISK5\r\n1-0:1.8.1(001581.123*kWh)\r\n1-0:2.8.1(000000.000*kWh)\r\n!709B\r\n",
//! );
//! let telegram = acquire(source).unwrap();
//! assert_eq!(telegram.value("1.8.1"), Some(MeasureValue::Float(1581.123)));
//! assert_eq!(telegram.get("2.8.1").unwrap().unit.as_deref(), Some("kWh"));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod obis;
pub mod output;
pub mod p1;
pub mod telegram;
pub mod util;

pub use crate::error::{FramingError, P1Error};
pub use crate::logging::{init_logger, init_logger_with_level, log_info, log_warn};

// Core telegram types
pub use obis::ObisCode;
pub use telegram::{parse_telegram, process_frame, Measure, MeasureValue, RawFrame, Telegram};

// Acquisition
pub use p1::{
    acquire, AsyncBufLineSource, AsyncLineSource, AsyncP1Reader, BufLineSource, LineSource,
    MockLineSource, P1Reader, SerialConfig,
};

/// Open the P1 serial port and read one telegram.
///
/// # Arguments
/// * `config` - Serial settings (port path, baud rate, read timeout)
///
/// # Returns
/// * `Ok(Telegram)` - Validated and decoded telegram
/// * `Err(P1Error)` - Port, transport, framing, checksum or decode failure
pub async fn read_telegram(config: &SerialConfig) -> Result<Telegram, P1Error> {
    let mut reader = p1::serial::connect(config).await?;
    reader.read_telegram().await
}
