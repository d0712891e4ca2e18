//! # Telegram Decoder
//!
//! Extracts every catalogued field from validated telegram content. Each
//! catalog code is looked up independently among the tokenized data lines, so
//! fields may appear in any order or not at all. For a matched field the first
//! payload group is split on `*` into value and unit, and the value is decoded
//! as a float when its text contains a decimal point, otherwise as an integer.
//!
//! A payload that is not valid numeric text fails the whole telegram with
//! [`P1Error::FieldDecode`]; a malformed field means the telegram cannot be
//! trusted even though its checksum matched.

use crate::constants::P1_UNIT_SEPARATOR;
use crate::error::P1Error;
use crate::obis::{ObisCode, ObisEntry, OBIS_CATALOG};
use crate::telegram::tokenizer::{data_lines, DataLine, MalformedLine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashMap;
use std::fmt;

/// Decoded numeric value; the kind follows the source text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Integer(i64),
    Float(f64),
}

impl MeasureValue {
    /// Decodes a value literal: floating-point if it contains `.`, integer otherwise.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.contains('.') {
            text.parse::<f64>()
                .map(MeasureValue::Float)
                .map_err(|e| e.to_string())
        } else {
            text.parse::<i64>()
                .map(MeasureValue::Integer)
                .map_err(|e| e.to_string())
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            MeasureValue::Integer(v) => v as f64,
            MeasureValue::Float(v) => v,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, MeasureValue::Float(_))
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Integer(v) => write!(f, "{v}"),
            MeasureValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One decoded field occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub obis: ObisCode,
    pub value: MeasureValue,
    pub unit: Option<String>,
    pub description: &'static str,
}

impl Measure {
    pub fn short_key(&self) -> &str {
        self.obis.short_key()
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.obis, self.value)?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        Ok(())
    }
}

/// The decoded result of one telegram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telegram {
    /// Measures keyed by short key (`1.8.1`, `96.14.0`, ...).
    pub measures: BTreeMap<String, Measure>,
    /// Capture time, assigned when the telegram was decoded.
    pub timestamp: DateTime<Utc>,
}

impl Telegram {
    pub fn get(&self, short_key: &str) -> Option<&Measure> {
        self.measures.get(short_key)
    }

    pub fn value(&self, short_key: &str) -> Option<MeasureValue> {
        self.get(short_key).map(|m| m.value)
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Telegram at {}", self.timestamp.to_rfc3339())?;
        for measure in self.measures.values() {
            writeln!(f, "  {measure}")?;
        }
        Ok(())
    }
}

/// Decodes a single payload into a measure for `code`.
pub fn decode_field(
    code: &str,
    payload: &str,
    description: &'static str,
) -> Result<Measure, P1Error> {
    let field_error = |reason: String| P1Error::FieldDecode {
        code: code.to_string(),
        payload: payload.to_string(),
        reason,
    };

    let (value_text, unit) = match payload.split_once(P1_UNIT_SEPARATOR) {
        Some((_, unit)) if unit.contains(P1_UNIT_SEPARATOR) => {
            return Err(field_error("more than one unit separator".into()));
        }
        Some((value, unit)) => (value, Some(unit.to_string())),
        None => (payload, None),
    };

    let value = MeasureValue::parse(value_text).map_err(field_error)?;

    Ok(Measure {
        obis: ObisCode::from(code),
        value,
        unit,
        description,
    })
}

/// Decodes every catalogued field present in `content`.
pub fn decode_measures(content: &str) -> Result<BTreeMap<String, Measure>, P1Error> {
    decode_measures_with(content, OBIS_CATALOG)
}

/// Decodes the fields of `catalog` present in `content`.
///
/// Two catalog codes sharing a short key fail with
/// [`P1Error::ShortKeyCollision`] when both are present.
pub fn decode_measures_with(
    content: &str,
    catalog: &[ObisEntry],
) -> Result<BTreeMap<String, Measure>, P1Error> {
    let mut first_lines: HashMap<&str, Result<DataLine<'_>, MalformedLine<'_>>> = HashMap::new();
    for line in data_lines(content) {
        let code = match &line {
            Ok(data) => data.code,
            Err(malformed) => malformed.code,
        };
        first_lines.entry(code).or_insert(line);
    }

    let mut measures = BTreeMap::new();
    for entry in catalog {
        let measure = match first_lines.get(entry.code) {
            None => continue,
            Some(Ok(line)) => {
                decode_field(entry.code, line.first_payload(), entry.description)?
            }
            Some(Err(malformed)) => {
                return Err(P1Error::FieldDecode {
                    code: entry.code.to_string(),
                    payload: malformed.text.to_string(),
                    reason: "unbalanced parentheses".into(),
                });
            }
        };
        log::trace!("Decoded {measure}");

        match measures.entry(measure.short_key().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(measure);
            }
            Entry::Occupied(slot) => {
                let existing: &Measure = slot.get();
                return Err(P1Error::ShortKeyCollision {
                    key: slot.key().clone(),
                    first: existing.obis.to_string(),
                    second: measure.obis.to_string(),
                });
            }
        }
    }

    Ok(measures)
}

/// Decodes validated content, stamping the telegram with the given capture time.
pub fn decode_at(content: &str, timestamp: DateTime<Utc>) -> Result<Telegram, P1Error> {
    let measures = decode_measures(content)?;
    log::debug!("Decoded {} measures", measures.len());
    Ok(Telegram {
        measures,
        timestamp,
    })
}

/// Decodes validated content, stamping the telegram with the current UTC time.
pub fn decode(content: &str) -> Result<Telegram, P1Error> {
    decode_at(content, Utc::now())
}
