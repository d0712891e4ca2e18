//! Configuration management for the P1 reader.
//!
//! Settings live in a YAML file with three sections, each of which may be
//! omitted entirely:
//!
//! ```yaml
//! serial:
//!   port: /dev/ttyUSB0
//!   baudrate: 115200
//!   timeout_secs: 12
//!   software_flow_control: true
//! logging:
//!   level: debug
//! output:
//!   path: /var/lib/p1/telegrams.jsonl
//!   format: energy
//! ```
//!
//! Command line arguments override file values through [`Config::apply_args`].

use crate::p1::serial::SerialConfig;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level filter (`error`, `warn`, `info`, `debug`, `trace`);
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// What is written for each decoded telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every decoded measure
    #[default]
    Telegram,
    /// The four energy registers only
    Energy,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append JSON lines to this file; stdout when absent.
    pub path: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub serial: SerialConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config =
            serde_yml::from_str(contents).context("Failed to parse YAML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Override configuration values with command line arguments.
    pub fn apply_args(&mut self, port: Option<String>, baudrate: Option<u32>, verbose: bool) {
        if let Some(port) = port {
            debug!("Overriding serial port from command line: {}", port);
            self.serial.port = port;
        }
        if let Some(baudrate) = baudrate {
            debug!("Overriding baudrate from command line: {}", baudrate);
            self.serial.baudrate = baudrate;
        }
        if verbose {
            self.logging.level = "debug".to_string();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            anyhow::bail!("serial.port must not be empty");
        }
        if self.serial.baudrate == 0 {
            anyhow::bail!("serial.baudrate must be greater than zero");
        }
        if self.serial.timeout_secs == 0 {
            anyhow::bail!("serial.timeout_secs must be greater than zero");
        }
        log::LevelFilter::from_str(&self.logging.level)
            .map_err(|_| anyhow::anyhow!("unknown logging.level {:?}", self.logging.level))?;
        Ok(())
    }
}
