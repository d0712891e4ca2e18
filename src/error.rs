//! # P1 Error Handling
//!
//! This module defines the [`P1Error`] enum, which represents the different error
//! types that can occur while acquiring and decoding a P1 telegram, and the
//! [`FramingError`] enum describing why a frame could not be delimited.

use thiserror::Error;

/// Reasons a telegram frame could not be assembled from the line stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// The line source was exhausted before a line containing `!` was seen.
    #[error("line source exhausted before telegram terminator ({buffered} bytes buffered)")]
    UnexpectedEof { buffered: usize },

    /// No line starting with `/` precedes the terminator.
    #[error("no start marker '/' found in telegram")]
    MissingStartMarker,

    /// The terminator line carries no checksum digits.
    #[error("terminator line carries no checksum")]
    MissingChecksum,

    /// The text after `!` is not four hexadecimal digits.
    #[error("invalid checksum field: {0:?}")]
    InvalidChecksumField(String),

    /// A received line contained bytes outside the ASCII range.
    #[error("non-ASCII data in telegram line")]
    NonAscii,

    /// The buffered telegram grew beyond the limit without a terminator.
    #[error("telegram exceeds {limit} bytes without terminator")]
    Oversized { limit: usize },
}

/// Represents the different error types that can occur in the P1 crate.
#[derive(Debug, Error)]
pub enum P1Error {
    /// Indicates that no complete frame could be delimited.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),

    /// Indicates a checksum mismatch; the telegram must be discarded.
    #[error("Checksum mismatch: declared {declared:04X}, calculated {calculated:04X}")]
    ChecksumMismatch { declared: u16, calculated: u16 },

    /// Indicates a matched field whose payload is not valid numeric text.
    #[error("Cannot decode field {code} from payload {payload:?}: {reason}")]
    FieldDecode {
        code: String,
        payload: String,
        reason: String,
    },

    /// Two catalog codes produced the same short key in one telegram.
    #[error("Short key {key} produced by both {first} and {second}")]
    ShortKeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// Read failure reported by the line source (timeout, disconnect, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Indicates an error opening or configuring the serial port.
    #[error("Serial port error: {0}")]
    SerialPort(String),

    /// A measure required by a projection is absent from the telegram.
    #[error("Missing measure {0}")]
    MissingMeasure(String),
}

impl P1Error {
    /// Returns `true` when retrying the acquisition immediately makes sense.
    ///
    /// Framing and checksum failures are not transient: the meter retransmits
    /// on its next cycle, so the caller should simply wait for it.
    pub fn is_transient(&self) -> bool {
        matches!(self, P1Error::Transport(_) | P1Error::SerialPort(_))
    }

    /// Returns `true` for read timeouts reported by the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(self, P1Error::Transport(e) if e.kind() == std::io::ErrorKind::TimedOut)
    }
}
