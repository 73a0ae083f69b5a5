use std::fmt;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{Coordinates, CustomerRecord, UserId, LATITUDE, LONGITUDE, NAME, USER_ID};
use crate::config::{CoordinateBounds, CoordinateRange};

// ---------------------------------------------------------------------------
// Rejection – why a single line was dropped
// ---------------------------------------------------------------------------

/// Reason a line did not become a [`CustomerRecord`].
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("`user_id` is null")]
    MissingPrimaryKey,

    #[error("`user_id` {value} is not an integer")]
    InvalidPrimaryKey { value: String },

    #[error("`{field}` {value} is not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("`{field}` {value} is outside {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: CoordinateRange,
    },
}

impl Rejection {
    /// True when the line could not be read as a record at all.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Rejection::Malformed(_) | Rejection::NotAnObject { .. })
    }
}

/// A rejected line together with its 1-based position in the input.
#[derive(Debug)]
pub struct Diagnostic {
    pub line_number: usize,
    pub rejection: Rejection,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rejection.is_parse_error() {
            write!(f, "malformed input at line {}: {}", self.line_number, self.rejection)
        } else {
            write!(f, "line {}: {}", self.line_number, self.rejection)
        }
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.rejection)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse and check one input line.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. the line is a JSON object
/// 2. `user_id`, `latitude`, `longitude` and `name` are present
///    (`latitude`, `longitude` and `name` must also be non-null)
/// 3. `user_id` is not null, and reads as an integer
/// 4. `latitude` / `longitude` read as numbers within `bounds`
///
/// On success the object is kept whole, extra fields included.
pub fn validate_line(
    raw: &[u8],
    line_number: usize,
    bounds: &CoordinateBounds,
) -> Result<CustomerRecord, Diagnostic> {
    check_record(raw, bounds).map_err(|rejection| Diagnostic {
        line_number,
        rejection,
    })
}

fn check_record(raw: &[u8], bounds: &CoordinateBounds) -> Result<CustomerRecord, Rejection> {
    let fields = match serde_json::from_slice::<JsonValue>(raw)? {
        JsonValue::Object(fields) => fields,
        other => {
            return Err(Rejection::NotAnObject {
                found: json_kind(&other),
            })
        }
    };

    if !fields.contains_key(USER_ID) {
        return Err(Rejection::MissingField { field: USER_ID });
    }
    for field in [LATITUDE, LONGITUDE, NAME] {
        if fields.get(field).map_or(true, JsonValue::is_null) {
            return Err(Rejection::MissingField { field });
        }
    }

    let user_id = primary_key(&fields[USER_ID])?;
    let latitude = coordinate(&fields, LATITUDE, bounds.latitude)?;
    let longitude = coordinate(&fields, LONGITUDE, bounds.longitude)?;

    Ok(CustomerRecord::new(
        user_id,
        Coordinates::new(latitude, longitude),
        fields,
    ))
}

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

/// Integer sort key from `user_id`: integers as-is, floats truncated toward
/// zero, integer text parsed.
///
/// JSON integers beyond `u64` already arrive as floats from the parser, so
/// they sort by their nearest `f64`; the same digits as text are exact.
fn primary_key(value: &JsonValue) -> Result<UserId, Rejection> {
    let key = match value {
        JsonValue::Null => return Err(Rejection::MissingPrimaryKey),
        JsonValue::Number(n) => n
            .as_i64()
            .map(UserId::from)
            .or_else(|| n.as_u64().map(UserId::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < UserId::MAX as f64)
                    .map(|f| f.trunc() as UserId)
            }),
        JsonValue::String(s) => s.trim().parse::<UserId>().ok(),
        _ => None,
    };
    key.ok_or_else(|| Rejection::InvalidPrimaryKey {
        value: value.to_string(),
    })
}

/// Coerce a coordinate field (number or numeric text) to `f64` and range
/// check it.
fn coordinate(
    fields: &Map<String, JsonValue>,
    field: &'static str,
    range: CoordinateRange,
) -> Result<f64, Rejection> {
    let raw = &fields[field];
    let value = match raw {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Rejection::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;

    if !range.contains(value) {
        return Err(Rejection::OutOfRange {
            field,
            value,
            range,
        });
    }
    Ok(value)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
