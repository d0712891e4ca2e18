//! # Telegram Framer
//!
//! Assembles one telegram out of a line-oriented stream. Lines are appended,
//! terminators included, until a line containing `!` arrives. The checksummed
//! content is then the span from the start marker (the first line beginning
//! with `/`) through the `!`; anything received before the start marker is
//! line noise from a telegram that was joined mid-way and is dropped.
//!
//! The assembler is incremental so that the blocking and async readers feed it
//! the same way:
//!
//! ```
//! use p1_rs::telegram::framer::FrameAssembler;
//!
//! let mut assembler = FrameAssembler::new();
//! assert!(assembler.push_line("/ISK5\r\n").unwrap().is_none());
//! assert!(assembler.push_line("0-0:96.14.0(0001)\r\n").unwrap().is_none());
//! let frame = assembler.push_line("!505A\r\n").unwrap().unwrap();
//! assert_eq!(frame.checksum, 0x505A);
//! assert!(frame.content.ends_with('!'));
//! ```

use crate::constants::{MAX_TELEGRAM_LEN, P1_CHECKSUM_DIGITS, P1_END_MARKER, P1_START_MARKER};
use crate::error::FramingError;

/// One delimited telegram, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Text from the `/` start marker through the `!` terminator, inclusive.
    pub content: String,
    /// Checksum declared after the terminator.
    pub checksum: u16,
    /// The terminating line as received.
    pub terminator_line: String,
}

/// Accumulates lines until a complete frame is seen.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: String,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes buffered for the telegram in progress.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Appends a line and returns the frame once the terminator line arrives.
    ///
    /// On error the partial telegram is dropped, so the assembler can be fed
    /// the lines of the next telegram straight away.
    pub fn push_line(&mut self, line: &str) -> Result<Option<RawFrame>, FramingError> {
        if !line.is_ascii() {
            self.buffer.clear();
            return Err(FramingError::NonAscii);
        }

        self.buffer.push_str(line);

        if let Some(bang) = line.find(P1_END_MARKER) {
            let raw = std::mem::take(&mut self.buffer);
            let bang_at = raw.len() - line.len() + bang;
            return extract_frame(&raw, bang_at, line).map(Some);
        }

        if self.buffer.len() > MAX_TELEGRAM_LEN {
            self.buffer.clear();
            return Err(FramingError::Oversized {
                limit: MAX_TELEGRAM_LEN,
            });
        }

        Ok(None)
    }

    /// Reports the end of the line source. Always a framing failure, since a
    /// completed frame would already have been returned by `push_line`.
    pub fn finish(&mut self) -> FramingError {
        let buffered = self.buffer.len();
        self.buffer.clear();
        FramingError::UnexpectedEof { buffered }
    }
}

/// Frames a complete captured telegram, e.g. one read from a file.
pub fn parse_frame(text: &str) -> Result<RawFrame, FramingError> {
    let mut assembler = FrameAssembler::new();
    for line in text.split_inclusive('\n') {
        if let Some(frame) = assembler.push_line(line)? {
            return Ok(frame);
        }
    }
    Err(assembler.finish())
}

fn extract_frame(raw: &str, bang_at: usize, line: &str) -> Result<RawFrame, FramingError> {
    let start = find_start_marker(&raw[..bang_at]).ok_or(FramingError::MissingStartMarker)?;
    if start > 0 {
        log::debug!("Discarding {start} bytes before start marker");
    }

    let content = raw[start..=bang_at].to_string();
    let digits = line[line.find(P1_END_MARKER).map_or(0, |i| i + 1)..].trim();
    let checksum = parse_checksum(digits)?;

    log::debug!("Telegram content ({} bytes), declared checksum {checksum:04X}", content.len());

    Ok(RawFrame {
        content,
        checksum,
        terminator_line: line.to_string(),
    })
}

/// Position of the first `/` that begins a line.
fn find_start_marker(text: &str) -> Option<usize> {
    if text.starts_with(P1_START_MARKER) {
        return Some(0);
    }
    text.match_indices('\n')
        .map(|(i, _)| i + 1)
        .find(|&i| text[i..].starts_with(P1_START_MARKER))
}

fn parse_checksum(digits: &str) -> Result<u16, FramingError> {
    if digits.is_empty() {
        return Err(FramingError::MissingChecksum);
    }
    if digits.len() != P1_CHECKSUM_DIGITS {
        return Err(FramingError::InvalidChecksumField(digits.to_string()));
    }
    let mut bytes = [0u8; 2];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| FramingError::InvalidChecksumField(digits.to_string()))?;
    Ok(u16::from_be_bytes(bytes))
}
