//! Permissive scalar coercion
//!
//! Raw values arrive from transports that do not preserve types (form
//! bodies, text rows), so coercion is deliberately lenient: it never fails.
//! Unparseable input becomes the target type's zero value and is logged,
//! not rejected. This is a known looseness, not a validation of shape.

use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::field::ScalarType;

static LEADING_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[+-]?\d+").unwrap());
static LEADING_FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?\d+(\.\d+)?([eE][+-]?\d+)?").unwrap());

/// Coerce a raw value to the declared scalar type. Total function: every
/// input produces a value of the requested kind.
pub fn coerce(raw: &Value, scalar: ScalarType) -> Value {
    match scalar {
        ScalarType::Boolean => Value::Bool(to_bool(raw)),
        ScalarType::Integer => Value::from(to_integer(raw)),
        ScalarType::Float => {
            // serde_json rejects NaN/inf; fall back to the zero value
            serde_json::Number::from_f64(to_float(raw)).map_or(Value::from(0.0), Value::Number)
        }
        ScalarType::String => Value::String(to_string(raw)),
        ScalarType::Uuid => Value::String(to_uuid(raw).hyphenated().to_string()),
        ScalarType::DateTime => Value::String(to_datetime(raw).to_rfc3339()),
    }
}

/// `"0"`, `""`, `"false"`, `false`, `0`, `0.0` and null are false;
/// everything else, compound values included, is true.
fn to_bool(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_integer(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => LEADING_INT
            .find(s)
            .and_then(|m| m.as_str().trim().parse::<i64>().ok())
            .unwrap_or_else(|| fallback(raw, "integer", 0)),
        _ => fallback(raw, "integer", 0),
    }
}

fn to_float(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => LEADING_FLOAT
            .find(s)
            .and_then(|m| m.as_str().trim().parse::<f64>().ok())
            .unwrap_or_else(|| fallback(raw, "float", 0.0)),
        _ => fallback(raw, "float", 0.0),
    }
}

fn to_string(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // compound values keep their JSON encoding
        other => other.to_string(),
    }
}

fn to_uuid(raw: &Value) -> Uuid {
    match raw {
        Value::String(s) => Uuid::parse_str(s.trim()).unwrap_or_else(|_| fallback(raw, "uuid", Uuid::nil())),
        _ => fallback(raw, "uuid", Uuid::nil()),
    }
}

/// Accepts RFC 3339, RFC 2822, or an integer unix timestamp.
fn to_datetime(raw: &Value) -> DateTime<Utc> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;

    match raw {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| fallback(raw, "datetime", epoch)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| fallback(raw, "datetime", epoch)),
        _ => fallback(raw, "datetime", epoch),
    }
}

fn fallback<T>(raw: &Value, kind: &str, zero: T) -> T {
    warn!("Cannot coerce {raw} to {kind}, using zero value");
    zero
}
