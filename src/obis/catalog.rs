//! Field Catalog
//!
//! Static table of the OBIS codes this crate decodes from a P1 telegram, as
//! defined in the DSMR P1 companion standard. Codes not listed here are
//! ignored by the decoder; adding a row is all that is needed to decode a
//! new numeric field.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObisEntry {
    pub code: &'static str,
    pub description: &'static str,
}

const fn entry(code: &'static str, description: &'static str) -> ObisEntry {
    ObisEntry { code, description }
}

/// Numeric OBIS codes carried by DSMR 4/5 electricity telegrams.
pub const OBIS_CATALOG: &[ObisEntry] = &[
    // Energy totals
    entry("1-0:1.8.1", "Meter Reading electricity delivered to client (Tariff 1) in kWh"),
    entry("1-0:1.8.2", "Meter Reading electricity delivered to client (Tariff 2) in kWh"),
    entry("1-0:2.8.1", "Meter Reading electricity delivered by client (Tariff 1) in kWh"),
    entry("1-0:2.8.2", "Meter Reading electricity delivered by client (Tariff 2) in kWh"),
    entry("0-0:96.14.0", "Tariff indicator electricity"),
    // Power
    entry("1-0:1.7.0", "Actual electricity power delivered (+P) in kW"),
    entry("1-0:2.7.0", "Actual electricity power received (-P) in kW"),
    entry("0-0:17.0.0", "The actual threshold electricity in kW"),
    entry("0-0:96.3.10", "Switch position electricity"),
    // Power failures and voltage events
    entry("0-0:96.7.21", "Number of power failures in any phase"),
    entry("0-0:96.7.9", "Number of long power failures in any phase"),
    entry("1-0:32.32.0", "Number of voltage sags in phase L1"),
    entry("1-0:52.32.0", "Number of voltage sags in phase L2"),
    entry("1-0:72.32.0", "Number of voltage sags in phase L3"),
    entry("1-0:32.36.0", "Number of voltage swells in phase L1"),
    entry("1-0:52.36.0", "Number of voltage swells in phase L2"),
    entry("1-0:72.36.0", "Number of voltage swells in phase L3"),
    // Instantaneous voltage
    entry("1-0:32.7.0", "Instantaneous voltage L1 in V"),
    entry("1-0:52.7.0", "Instantaneous voltage L2 in V"),
    entry("1-0:72.7.0", "Instantaneous voltage L3 in V"),
    // Instantaneous current
    entry("1-0:31.7.0", "Instantaneous current L1 in A"),
    entry("1-0:51.7.0", "Instantaneous current L2 in A"),
    entry("1-0:71.7.0", "Instantaneous current L3 in A"),
    // Instantaneous power per phase
    entry("1-0:21.7.0", "Instantaneous active power L1 (+P) in kW"),
    entry("1-0:41.7.0", "Instantaneous active power L2 (+P) in kW"),
    entry("1-0:61.7.0", "Instantaneous active power L3 (+P) in kW"),
    entry("1-0:22.7.0", "Instantaneous active power L1 (-P) in kW"),
    entry("1-0:42.7.0", "Instantaneous active power L2 (-P) in kW"),
    entry("1-0:62.7.0", "Instantaneous active power L3 (-P) in kW"),
];

static CATALOG_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    OBIS_CATALOG
        .iter()
        .map(|e| (e.code, e.description))
        .collect()
});

/// Returns the description of a catalogued code, `None` if the code is not of interest.
pub fn lookup(code: &str) -> Option<&'static str> {
    CATALOG_INDEX.get(code).copied()
}

/// Iterates over every catalogued code.
pub fn entries() -> impl Iterator<Item = &'static ObisEntry> {
    OBIS_CATALOG.iter()
}
