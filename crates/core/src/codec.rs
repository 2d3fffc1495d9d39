//! Field codec: native values <-> the store's string representation
//!
//! Every field of a primary record, and every value baked into an index key,
//! goes through this codec. The forms are locale-invariant and round-trip:
//!
//! | Kind      | Encoded form                                         |
//! |-----------|------------------------------------------------------|
//! | Bool      | `"1"` / `"0"` (decode also accepts `true`/`false`)   |
//! | Char      | the character itself                                 |
//! | Int/UInt  | base-10 digits                                       |
//! | Float     | Rust's shortest round-trip decimal form              |
//! | Decimal   | canonical decimal string                             |
//! | Duration  | signed microsecond count                             |
//! | Timestamp | microseconds since the Unix epoch                    |
//! | String    | identity                                             |
//! | Complex   | JSON                                                 |
//!
//! Decode failures are never expected when reading data this codec wrote,
//! but the store is mutable by other parties, so malformed input surfaces as
//! `Error::Decode` rather than a panic.

use crate::error::{Error, Result};
use crate::field::{duration_micros, FieldKind, FieldValue};
use chrono::{DateTime, Duration};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Longest prefix of a malformed input echoed back in `Error::Decode`
const DECODE_INPUT_PREVIEW: usize = 64;

/// Encode a field value into the store's string representation
pub fn encode(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        FieldValue::Char(c) => c.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::UInt(u) => u.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Decimal(d) => d.to_string(),
        FieldValue::Duration(d) => duration_micros(*d).to_string(),
        FieldValue::Timestamp(t) => t.timestamp_micros().to_string(),
        FieldValue::String(s) => s.clone(),
        // serde_json::Value -> String cannot fail
        FieldValue::Complex(v) => v.to_string(),
    }
}

/// Decode a stored string back into a value of the given kind
///
/// Fails with `Error::Decode` on malformed input.
pub fn decode(kind: FieldKind, raw: &str) -> Result<FieldValue> {
    match kind {
        FieldKind::Bool => decode_bool(raw),
        FieldKind::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(FieldValue::Char(c)),
                _ => Err(decode_error(kind, raw, "expected exactly one character")),
            }
        }
        FieldKind::Int => raw
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
        FieldKind::UInt => raw
            .parse::<u64>()
            .map(FieldValue::UInt)
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
        FieldKind::Float => raw
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
        FieldKind::Decimal => Decimal::from_str(raw)
            .map(FieldValue::Decimal)
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
        FieldKind::Duration => raw
            .parse::<i64>()
            .map(|us| FieldValue::Duration(Duration::microseconds(us)))
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
        FieldKind::Timestamp => {
            let micros = raw
                .parse::<i64>()
                .map_err(|e| decode_error(kind, raw, &e.to_string()))?;
            DateTime::from_timestamp_micros(micros)
                .map(FieldValue::Timestamp)
                .ok_or_else(|| decode_error(kind, raw, "timestamp out of range"))
        }
        FieldKind::String => Ok(FieldValue::String(raw.to_string())),
        FieldKind::Complex => serde_json::from_str(raw)
            .map(FieldValue::Complex)
            .map_err(|e| decode_error(kind, raw, &e.to_string())),
    }
}

/// Bool decoding accepts the canonical `1`/`0` plus case-insensitive
/// `true`/`false`, matching what other writers commonly leave behind.
fn decode_bool(raw: &str) -> Result<FieldValue> {
    match raw {
        "1" => return Ok(FieldValue::Bool(true)),
        "0" => return Ok(FieldValue::Bool(false)),
        _ => {}
    }
    if raw.eq_ignore_ascii_case("true") {
        Ok(FieldValue::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(FieldValue::Bool(false))
    } else {
        Err(decode_error(FieldKind::Bool, raw, "expected 1/0/true/false"))
    }
}

fn decode_error(kind: FieldKind, raw: &str, reason: &str) -> Error {
    let input = if raw.len() > DECODE_INPUT_PREVIEW {
        let mut end = DECODE_INPUT_PREVIEW;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &raw[..end])
    } else {
        raw.to_string()
    };
    Error::Decode {
        kind,
        input,
        reason: reason.to_string(),
    }
}
