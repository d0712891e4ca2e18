//! # P1 Serial Port
//!
//! Opens the meter's P1 port with `tokio-serial`. DSMR 4 and 5 meters send at
//! 115200 baud, 8 data bits, no parity, one stop bit; XON/XOFF software flow
//! control is on by default since common P1 cables expect it.

use crate::constants::{P1_DEFAULT_BAUDRATE, P1_DEFAULT_PORT, P1_DEFAULT_TIMEOUT_SECS};
use crate::error::P1Error;
use crate::p1::line_source::AsyncBufLineSource;
use crate::p1::reader::AsyncP1Reader;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::BufReader;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

/// Configuration for the serial connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baudrate: u32,
    /// Read timeout for one line, in seconds
    pub timeout_secs: u64,
    pub software_flow_control: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            port: P1_DEFAULT_PORT.to_string(),
            baudrate: P1_DEFAULT_BAUDRATE,
            timeout_secs: P1_DEFAULT_TIMEOUT_SECS,
            software_flow_control: true,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn flow_control(&self) -> FlowControl {
        if self.software_flow_control {
            FlowControl::Software
        } else {
            FlowControl::None
        }
    }
}

/// Line source reading from the P1 port.
pub type SerialLineSource = AsyncBufLineSource<BufReader<SerialStream>>;

/// Opens the serial port with the P1 line settings.
pub fn open(config: &SerialConfig) -> Result<SerialStream, P1Error> {
    log::debug!(
        "Opening {} at {} baud (xonxoff={})",
        config.port,
        config.baudrate,
        config.software_flow_control
    );
    tokio_serial::new(config.port.as_str(), config.baudrate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(config.flow_control())
        .timeout(config.timeout())
        .open_native_async()
        .map_err(|e| P1Error::SerialPort(format!("{}: {e}", config.port)))
}

/// Opens the port and wraps it into an async telegram reader.
pub async fn connect(config: &SerialConfig) -> Result<AsyncP1Reader<SerialLineSource>, P1Error> {
    let port = open(config)?;
    let source = AsyncBufLineSource::with_timeout(BufReader::new(port), config.timeout());
    Ok(AsyncP1Reader::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baudrate, 115_200);
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(config.flow_control(), FlowControl::Software);
    }

    #[tokio::test]
    async fn test_open_missing_port() {
        let config = SerialConfig {
            port: "/dev/does-not-exist-p1".to_string(),
            ..SerialConfig::default()
        };
        let err = match connect(&config).await {
            Ok(_) => panic!("opened a port that does not exist"),
            Err(err) => err,
        };
        assert!(matches!(err, P1Error::SerialPort(_)));
        assert!(err.is_transient());
    }
}
