//! The telegram module contains the protocol core: framing a telegram out of a
//! line stream, verifying its CRC-16 checksum, and decoding its fields.

pub mod checksum;
pub mod decoder;
pub mod framer;
pub mod tokenizer;

pub use decoder::{
    decode, decode_at, decode_measures, decode_measures_with, Measure, MeasureValue, Telegram,
};
pub use framer::{parse_frame, FrameAssembler, RawFrame};

use crate::error::P1Error;
use crate::util::log_telegram;

/// Validates a delimited frame and decodes it. A frame whose checksum does
/// not match is rejected before any field is looked at.
pub fn process_frame(frame: &RawFrame) -> Result<Telegram, P1Error> {
    log_telegram("frame", &frame.content);
    checksum::ensure_valid(frame.content.as_bytes(), frame.checksum)?;
    decode(&frame.content)
}

/// Frames, validates and decodes a complete captured telegram.
pub fn parse_telegram(text: &str) -> Result<Telegram, P1Error> {
    let frame = parse_frame(text)?;
    process_frame(&frame)
}
