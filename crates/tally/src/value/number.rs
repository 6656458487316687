use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// NumericPolicy
///
/// How a field value becomes a number before arithmetic.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Host-style conversion: never fails, may produce NaN.
    #[default]
    Lenient,
    /// Only `Int`/`Float` values are numbers.
    Strict,
}

/// Convert an optional field value to a number under `policy`.
///
/// Lenient rules: absent → NaN, `Null` → 0, `Bool` → 0/1, text is trimmed
/// (empty → 0, `0x`/`0o`/`0b` prefixes read as radix integers, decimals
/// overflow to ±Infinity, anything else unparseable → NaN), lists and
/// maps → NaN.
/// Strict rules return `None` for anything that is not already numeric.
#[must_use]
pub fn coerce_number(value: Option<&Value>, policy: NumericPolicy) -> Option<f64> {
    match policy {
        NumericPolicy::Strict => value.and_then(Value::as_f64),
        NumericPolicy::Lenient => Some(lenient_number(value)),
    }
}

fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::List(_) | Value::Map(_)) => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(v @ (Value::Int(_) | Value::Float(_))) => v.as_f64().unwrap_or(f64::NAN),
        Some(Value::Text(s)) => parse_text(s),
    }
}

fn parse_text(s: &str) -> f64 {
    let trimmed = s.trim();
    let (prefix, digits) = trimmed.split_at_checked(2).unwrap_or((trimmed, ""));

    match (trimmed, prefix) {
        ("", _) => 0.0,
        ("Infinity" | "+Infinity", _) => f64::INFINITY,
        ("-Infinity", _) => f64::NEG_INFINITY,
        (_, "0x" | "0X") => parse_radix(digits, 16),
        (_, "0o" | "0O") => parse_radix(digits, 8),
        (_, "0b" | "0B") => parse_radix(digits, 2),
        // Rust accepts "inf"/"nan" spellings; those are not numbers here
        _ if trimmed
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) =>
        {
            f64::NAN
        }
        // out-of-range literals overflow to ±Infinity
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

// Unsigned integer literal in `radix`; signs and separators are not allowed.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
        })
        .unwrap_or(f64::NAN)
}
