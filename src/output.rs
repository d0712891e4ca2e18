//! Telegram output.
//!
//! Persisting telegrams is up to the caller; this module provides the two
//! shapes the reader binary emits. [`EnergyReading`] is the row of the four
//! cumulative energy registers plus capture time, and [`JsonLinesSink`]
//! appends one JSON object per telegram to any writer.

use crate::config::OutputFormat;
use crate::error::P1Error;
use crate::telegram::Telegram;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Cumulative energy registers of one telegram, in kWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyReading {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "1.8.1")]
    pub delivered_tariff1: f64,
    #[serde(rename = "1.8.2")]
    pub delivered_tariff2: f64,
    #[serde(rename = "2.8.1")]
    pub received_tariff1: f64,
    #[serde(rename = "2.8.2")]
    pub received_tariff2: f64,
}

impl EnergyReading {
    pub fn from_telegram(telegram: &Telegram) -> Result<Self, P1Error> {
        let register = |key: &str| {
            telegram
                .value(key)
                .map(|v| v.as_f64())
                .ok_or_else(|| P1Error::MissingMeasure(key.to_string()))
        };

        Ok(EnergyReading {
            timestamp: telegram.timestamp,
            delivered_tariff1: register("1.8.1")?,
            delivered_tariff2: register("1.8.2")?,
            received_tariff1: register("2.8.1")?,
            received_tariff2: register("2.8.2")?,
        })
    }
}

/// Consumer of decoded telegrams.
pub trait TelegramSink {
    fn write_telegram(&mut self, telegram: &Telegram) -> Result<()>;
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        JsonLinesSink { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TelegramSink for JsonLinesSink<W> {
    fn write_telegram(&mut self, telegram: &Telegram) -> Result<()> {
        match self.format {
            OutputFormat::Telegram => serde_json::to_writer(&mut self.writer, telegram)
                .context("Failed to serialize telegram")?,
            OutputFormat::Energy => {
                let reading = EnergyReading::from_telegram(telegram)?;
                serde_json::to_writer(&mut self.writer, &reading)
                    .context("Failed to serialize energy reading")?
            }
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }
}
