//! # Telegram Acquisition
//!
//! Composes the line source, the framer, the checksum validator and the
//! decoder. One call to `read_telegram` is one blocking sequence: read lines
//! until the terminator, validate, decode. Every failure comes back as a
//! distinct [`P1Error`] variant so the caller can choose between retrying
//! right away ([`P1Error::is_transient`]) and waiting for the next telegram.

use crate::error::{FramingError, P1Error};
use crate::p1::line_source::{AsyncLineSource, LineSource};
use crate::telegram::{process_frame, FrameAssembler, RawFrame, Telegram};

/// Blocking P1 reader over any [`LineSource`].
#[derive(Debug)]
pub struct P1Reader<S> {
    source: S,
    assembler: FrameAssembler,
}

impl<S: LineSource> P1Reader<S> {
    pub fn new(source: S) -> Self {
        P1Reader {
            source,
            assembler: FrameAssembler::new(),
        }
    }

    /// Reads lines until one complete frame has been delimited.
    pub fn read_frame(&mut self) -> Result<RawFrame, P1Error> {
        loop {
            let line = match self.source.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Err(self.assembler.finish().into()),
                Err(e) => {
                    self.assembler = FrameAssembler::new();
                    return Err(e);
                }
            };
            if let Some(frame) = self.assembler.push_line(&line)? {
                return Ok(frame);
            }
        }
    }

    /// Reads, validates and decodes the next telegram.
    pub fn read_telegram(&mut self) -> Result<Telegram, P1Error> {
        let frame = self.read_frame()?;
        process_frame(&frame)
    }

}

/// Yields every telegram of a finite source, such as a capture file.
///
/// Iteration ends when the source is exhausted between telegrams. Failed
/// telegrams are yielded as errors and iteration carries on with the next
/// one; a source that ends mid-telegram yields `UnexpectedEof` once.
impl<S: LineSource> Iterator for P1Reader<S> {
    type Item = Result<Telegram, P1Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_telegram() {
            Err(P1Error::Framing(FramingError::UnexpectedEof { buffered: 0 })) => None,
            result => Some(result),
        }
    }
}

/// Async P1 reader over any [`AsyncLineSource`].
#[derive(Debug)]
pub struct AsyncP1Reader<S> {
    source: S,
    assembler: FrameAssembler,
}

impl<S: AsyncLineSource> AsyncP1Reader<S> {
    pub fn new(source: S) -> Self {
        AsyncP1Reader {
            source,
            assembler: FrameAssembler::new(),
        }
    }

    /// Reads lines until one complete frame has been delimited.
    pub async fn read_frame(&mut self) -> Result<RawFrame, P1Error> {
        loop {
            let line = match self.source.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Err(self.assembler.finish().into()),
                Err(e) => {
                    self.assembler = FrameAssembler::new();
                    return Err(e);
                }
            };
            if let Some(frame) = self.assembler.push_line(&line)? {
                return Ok(frame);
            }
        }
    }

    /// Reads, validates and decodes the next telegram.
    pub async fn read_telegram(&mut self) -> Result<Telegram, P1Error> {
        let frame = self.read_frame().await?;
        process_frame(&frame)
    }
}

/// Acquires one telegram from a blocking line source.
pub fn acquire<S: LineSource>(source: S) -> Result<Telegram, P1Error> {
    P1Reader::new(source).read_telegram()
}
