//! Line sources feeding the telegram framer.
//!
//! The acquisition core only needs "the next line, or nothing more". A read
//! failure, including a read timeout, is surfaced as [`P1Error::Transport`]
//! and never mistaken for the end of the stream.

use crate::constants::MAX_TELEGRAM_LEN;
use crate::error::{FramingError, P1Error};
use async_trait::async_trait;
use std::io::{self, BufRead, Read};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Bytes read per line before giving up on finding its newline.
const LINE_READ_LIMIT: u64 = MAX_TELEGRAM_LEN as u64 + 1;

/// Blocking source of telegram lines.
pub trait LineSource {
    /// Returns the next line with its terminator, or `None` once exhausted.
    fn read_line(&mut self) -> Result<Option<String>, P1Error>;
}

/// Async source of telegram lines.
#[async_trait]
pub trait AsyncLineSource: Send {
    /// Returns the next line with its terminator, or `None` once exhausted.
    async fn read_line(&mut self) -> Result<Option<String>, P1Error>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn read_line(&mut self) -> Result<Option<String>, P1Error> {
        (**self).read_line()
    }
}

fn line_from_bytes(bytes: Vec<u8>) -> Result<Option<String>, P1Error> {
    if bytes.is_empty() {
        return Ok(None);
    }
    if bytes.len() > MAX_TELEGRAM_LEN {
        return Err(FramingError::Oversized {
            limit: MAX_TELEGRAM_LEN,
        }
        .into());
    }
    if !bytes.is_ascii() {
        return Err(FramingError::NonAscii.into());
    }
    let line = String::from_utf8(bytes).map_err(|_| FramingError::NonAscii)?;
    log::debug!("{}", line.trim_end());
    Ok(Some(line))
}

/// Adapts any [`BufRead`] (a file, a blocking serial port, a byte slice).
#[derive(Debug)]
pub struct BufLineSource<R> {
    reader: R,
}

impl<R: BufRead> BufLineSource<R> {
    pub fn new(reader: R) -> Self {
        BufLineSource { reader }
    }
}

impl<R: BufRead> LineSource for BufLineSource<R> {
    fn read_line(&mut self) -> Result<Option<String>, P1Error> {
        let mut buf = Vec::new();
        (&mut self.reader)
            .take(LINE_READ_LIMIT)
            .read_until(b'\n', &mut buf)?;
        line_from_bytes(buf)
    }
}

/// Adapts any [`AsyncBufRead`], with an optional per-line read timeout.
#[derive(Debug)]
pub struct AsyncBufLineSource<R> {
    reader: R,
    timeout: Option<Duration>,
}

impl<R: AsyncBufRead + Unpin + Send> AsyncBufLineSource<R> {
    pub fn new(reader: R) -> Self {
        AsyncBufLineSource {
            reader,
            timeout: None,
        }
    }

    pub fn with_timeout(reader: R, timeout: Duration) -> Self {
        AsyncBufLineSource {
            reader,
            timeout: Some(timeout),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> AsyncLineSource for AsyncBufLineSource<R> {
    async fn read_line(&mut self) -> Result<Option<String>, P1Error> {
        let mut buf = Vec::new();
        match self.timeout {
            Some(to) => {
                let mut limited = (&mut self.reader).take(LINE_READ_LIMIT);
                tokio::time::timeout(to, limited.read_until(b'\n', &mut buf))
                    .await
                    .map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("no data within {} ms", to.as_millis()),
                        )
                    })??;
            }
            None => {
                (&mut self.reader)
                    .take(LINE_READ_LIMIT)
                    .read_until(b'\n', &mut buf)
                    .await?;
            }
        }
        line_from_bytes(buf)
    }
}
