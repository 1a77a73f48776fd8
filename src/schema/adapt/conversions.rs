//! Total conversions between raw field values and canonical encodings.
//!
//! Every function here is total: malformed input degrades to a policy
//! default (`0` or the value's string form) and never produces an error.

use crate::schema::{Coercion, FieldValue};

const YES_VALUES: [&str; 4] = ["y", "yes", "1", "true"];
const NO_VALUES: [&str; 4] = ["n", "no", "0", "false"];
const MALE_VALUES: [&str; 2] = ["m", "male"];

/// Apply a field's coercion rule
#[must_use]
pub fn coerce(value: &FieldValue, coercion: Coercion) -> FieldValue {
    match coercion {
        Coercion::None => value.clone(),
        Coercion::Sex => FieldValue::Number(coerce_sex(value)),
        Coercion::YesNo => FieldValue::Number(coerce_yes_no(value)),
    }
}

/// Encode a sex/gender value: male is `1`, everything else `0`
///
/// Numbers are treated as an existing encoding, so `1` stays `1`.
#[must_use]
pub fn coerce_sex(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(n) if *n == 1.0 => 1.0,
        FieldValue::Number(_) => 0.0,
        FieldValue::Text(s) => {
            let s = s.trim().to_lowercase();
            if MALE_VALUES.contains(&s.as_str()) { 1.0 } else { 0.0 }
        }
    }
}

/// Encode a yes/no-like value as `1`/`0`
///
/// Unrecognized strings fall back to an integer parse and then to `0`.
/// Integral numbers pass through unchanged; fractional or non-finite
/// numbers become `0`.
#[must_use]
pub fn coerce_yes_no(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 => *n,
        FieldValue::Number(_) => 0.0,
        FieldValue::Text(s) => {
            let s = s.trim().to_lowercase();
            if YES_VALUES.contains(&s.as_str()) {
                1.0
            } else if NO_VALUES.contains(&s.as_str()) {
                0.0
            } else {
                s.parse::<i64>().map(|n| n as f64).unwrap_or(0.0)
            }
        }
    }
}

/// Parse a value as a number, falling back to `0`
#[must_use]
pub fn to_numeric(value: &FieldValue) -> f64 {
    let parsed = match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Render a value as a category label
///
/// Integral numbers are rendered without a fractional part so that `1` and
/// `"1"` map to the same category.
#[must_use]
pub fn to_categorical(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
            format!("{}", *n as i64)
        }
        FieldValue::Number(n) => format!("{n}"),
    }
}
