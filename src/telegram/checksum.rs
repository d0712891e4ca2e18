//! Telegram checksum validation.
//!
//! DSMR telegrams carry a CRC-16/ARC (polynomial 0x8005 reflected, initial
//! value 0, no final xor) computed over every byte from the `/` start marker
//! up to and including the `!` terminator.

use crate::error::P1Error;
use crc::{Crc, CRC_16_ARC};

const P1_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Computes the telegram checksum of a byte span.
pub fn compute(bytes: &[u8]) -> u16 {
    P1_CRC.checksum(bytes)
}

/// Returns `true` when `content` matches the declared checksum.
pub fn verify(content: &[u8], expected: u16) -> bool {
    compute(content) == expected
}

/// Verifies the checksum, reporting a mismatch as [`P1Error::ChecksumMismatch`].
pub fn ensure_valid(content: &[u8], declared: u16) -> Result<(), P1Error> {
    let calculated = compute(content);
    if calculated != declared {
        log::warn!("CRC mismatch: declared {declared:04X}, calculated {calculated:04X}");
        return Err(P1Error::ChecksumMismatch {
            declared,
            calculated,
        });
    }
    log::debug!("CRC valid: {declared:04X}");
    Ok(())
}
