//! Field value model for objmap
//!
//! This module defines:
//! - `FieldKind`: the closed set of value kinds a schema field may declare
//! - `FieldValue`: a dynamically-typed field value, one variant per kind
//!
//! ## Kind Rules
//!
//! - Different kinds are never equal: `Int(1) != Float(1.0)`
//! - `Float` follows IEEE-754 equality (`NaN != NaN`)
//! - `Complex` covers structured values (nested objects, collections) and is
//!   encoded through the generic JSON fallback codec
//!
//! ## Score Projection
//!
//! Sortable fields are mirrored into a score-ordered structure whose score is
//! a 64-bit float. Only kinds whose values fit such a score without widening
//! past 8 bytes may be declared sortable; `FieldKind::fits_score` is the
//! gate and `FieldValue::score` is the projection.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// The closed set of value kinds a schema field may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Boolean, encoded as `"1"` / `"0"`
    Bool,
    /// Single Unicode scalar value
    Char,
    /// 64-bit signed integer (covers the signed integer family)
    Int,
    /// 64-bit unsigned integer (covers the unsigned integer family)
    UInt,
    /// 64-bit IEEE-754 floating point
    Float,
    /// Fixed-point decimal (128-bit mantissa; not score-representable)
    Decimal,
    /// Signed time span with microsecond resolution
    Duration,
    /// UTC instant with microsecond resolution
    Timestamp,
    /// UTF-8 string
    String,
    /// Structured value, round-tripped through JSON
    Complex,
}

impl FieldKind {
    /// Whether values of this kind can be projected to a 64-bit float score
    ///
    /// This is the legality condition for `sortable` fields: the value must
    /// be numeric-representable and no wider than 8 bytes. `Decimal` is 16
    /// bytes wide and `String`/`Complex` have no numeric ordering, so all
    /// three are excluded.
    pub fn fits_score(self) -> bool {
        matches!(
            self,
            FieldKind::Bool
                | FieldKind::Char
                | FieldKind::Int
                | FieldKind::UInt
                | FieldKind::Float
                | FieldKind::Duration
                | FieldKind::Timestamp
        )
    }
}

/// A dynamically-typed field value
///
/// Entities surface their fields through this enum so the mapper can encode,
/// diff and index them without reflection. Exactly one variant per
/// `FieldKind`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Signed integer value
    Int(i64),
    /// Unsigned integer value
    UInt(u64),
    /// Floating point value (IEEE-754 equality: `NaN != NaN`)
    Float(f64),
    /// Fixed-point decimal value
    Decimal(Decimal),
    /// Time span value
    Duration(Duration),
    /// UTC timestamp value
    Timestamp(DateTime<Utc>),
    /// String value
    String(String),
    /// Structured value
    Complex(serde_json::Value),
}

impl FieldValue {
    /// The kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Char(_) => FieldKind::Char,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::UInt(_) => FieldKind::UInt,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Decimal(_) => FieldKind::Decimal,
            FieldValue::Duration(_) => FieldKind::Duration,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Complex(_) => FieldKind::Complex,
        }
    }

    /// Project this value to a 64-bit float score, if its kind allows it
    ///
    /// Returns `None` exactly when `self.kind().fits_score()` is false.
    /// Integer values beyond 2^53 lose precision, matching the resolution of
    /// the score-ordered structure they feed.
    pub fn score(&self) -> Option<f64> {
        match self {
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Char(c) => Some(f64::from(u32::from(*c))),
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::UInt(u) => Some(*u as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Duration(d) => Some(duration_micros(*d) as f64),
            FieldValue::Timestamp(t) => Some(t.timestamp_micros() as f64),
            FieldValue::Decimal(_) | FieldValue::String(_) | FieldValue::Complex(_) => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Total microseconds of a `chrono::Duration`
///
/// Saturates at the i64 boundary instead of panicking; spans anywhere near
/// ±292,000 years are far outside the store's useful range.
pub(crate) fn duration_micros(d: Duration) -> i64 {
    d.num_microseconds().unwrap_or_else(|| {
        if d < Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<char> for FieldValue {
    fn from(v: char) -> Self {
        FieldValue::Char(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<Decimal> for FieldValue {
    fn from(v: Decimal) -> Self {
        FieldValue::Decimal(v)
    }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self {
        FieldValue::Duration(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Complex(v)
    }
}
