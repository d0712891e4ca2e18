//! OBIS code identifier.

use serde::Serialize;
use std::fmt;

/// An OBIS field identifier in dotted-colon notation, e.g. `1-0:1.8.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObisCode(String);

impl ObisCode {
    pub fn new(code: impl Into<String>) -> Self {
        ObisCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key a decoded measure is stored under: the segment after the first
    /// colon (`1.8.1` for `1-0:1.8.1`).
    pub fn short_key(&self) -> &str {
        short_key(&self.0)
    }
}

/// Short key of a raw code string. A code without a colon is its own key.
pub fn short_key(code: &str) -> &str {
    code.split(':').nth(1).unwrap_or(code)
}

impl fmt::Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObisCode {
    fn from(code: &str) -> Self {
        ObisCode::new(code)
    }
}

impl AsRef<str> for ObisCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
