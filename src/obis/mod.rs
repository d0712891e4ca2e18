//! The obis module contains the Field Catalog (the static table of OBIS codes
//! this crate decodes) and the [`ObisCode`] identifier type.

pub mod catalog;
pub mod code;

pub use catalog::{entries, lookup, ObisEntry, OBIS_CATALOG};
pub use code::ObisCode;
