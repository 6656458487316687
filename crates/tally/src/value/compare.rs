use crate::value::Value;
use std::cmp::Ordering;

/// Equality with numeric widening: `Int(2)` equals `Float(2.0)`.
/// All other variants compare structurally.
#[must_use]
pub fn compare_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (l, r) if l.is_numeric() && r.is_numeric() => l.as_f64() == r.as_f64(),
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(l, r)| compare_eq(l, r))
        }
        _ => left == right,
    }
}

/// Ordering between comparable values.
///
/// Numbers order against numbers (widened to f64, exact for two ints),
/// text against text, bools against bools. Anything else is unordered.
#[must_use]
pub fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (l, r) if l.is_numeric() && r.is_numeric() => l.as_f64()?.partial_cmp(&r.as_f64()?),
        _ => None,
    }
}
