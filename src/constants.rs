//! P1 Protocol Constants
//!
//! This module defines constants used in the P1 telegram implementation,
//! based on the DSMR P1 companion standard.

/// Telegram start marker; the first line of a telegram begins with it.
pub const P1_START_MARKER: char = '/';

/// Telegram terminator; followed by the four checksum digits.
pub const P1_END_MARKER: char = '!';

/// Separator between value and unit inside a field payload
pub const P1_UNIT_SEPARATOR: char = '*';

/// Number of hexadecimal digits in the checksum field
pub const P1_CHECKSUM_DIGITS: usize = 4;

/// Upper bound on a buffered telegram before framing gives up.
/// DSMR 5 telegrams with long text messages stay well below 4 KiB.
pub const MAX_TELEGRAM_LEN: usize = 16 * 1024;

// ----------------------------------------------------------------------------
// Serial defaults (DSMR 4/5: 115200 baud, 8N1)
// ----------------------------------------------------------------------------

pub const P1_DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const P1_DEFAULT_BAUDRATE: u32 = 115_200;

/// Meters send a telegram every 1 s (DSMR 5) or 10 s (DSMR 4); the read
/// timeout must cover a full cycle.
pub const P1_DEFAULT_TIMEOUT_SECS: u64 = 12;
