//! Mock line source for testing
//!
//! Replays queued lines, and can be told to fail with an I/O error once the
//! queued lines run out, to simulate a meter that stops sending or a cable
//! that is pulled.

use crate::error::P1Error;
use crate::p1::line_source::{AsyncLineSource, LineSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;

/// Scripted line source.
#[derive(Debug, Default)]
pub struct MockLineSource {
    lines: VecDeque<String>,
    error_after_lines: Option<io::ErrorKind>,
    lines_read: usize,
}

impl MockLineSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the lines of `text`, keeping their terminators.
    pub fn from_text(text: &str) -> Self {
        let mut source = Self::new();
        source.queue_text(text);
        source
    }

    pub fn queue_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn queue_text(&mut self, text: &str) {
        self.lines
            .extend(text.split_inclusive('\n').map(str::to_string));
    }

    /// Fails with `kind` once every queued line has been read.
    pub fn fail_when_drained(&mut self, kind: io::ErrorKind) {
        self.error_after_lines = Some(kind);
    }

    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    fn next(&mut self) -> Result<Option<String>, P1Error> {
        match self.lines.pop_front() {
            Some(line) => {
                self.lines_read += 1;
                Ok(Some(line))
            }
            None => match self.error_after_lines.take() {
                Some(kind) => Err(io::Error::new(kind, "simulated transport failure").into()),
                None => Ok(None),
            },
        }
    }
}

impl LineSource for MockLineSource {
    fn read_line(&mut self) -> Result<Option<String>, P1Error> {
        self.next()
    }
}

#[async_trait]
impl AsyncLineSource for MockLineSource {
    async fn read_line(&mut self) -> Result<Option<String>, P1Error> {
        self.next()
    }
}
