//! JSON value comparison and truthiness
//!
//! Shared by the operator evaluator and the sorter. Two comparison flavours
//! exist: a total order used for sorting (type rank first, then natural order)
//! and a partial order used by relational operators, which refuses to compare
//! values of different kinds.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Rank of a JSON type in the total sort order.
///
/// null < bool < number < string < array < object
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Compares two JSON numbers, exact for integers.
///
/// Returns `None` only when a float comparison is undefined.
pub fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(a_i), Some(b_i)) = (a.as_i64(), b.as_i64()) {
        return Some(a_i.cmp(&b_i));
    }
    if let (Some(a_u), Some(b_u)) = (a.as_u64(), b.as_u64()) {
        return Some(a_u.cmp(&b_u));
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a_f), Some(b_f)) => a_f.partial_cmp(&b_f),
        _ => None,
    }
}

/// Total order over JSON values for sorting.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let a_rank = type_rank(a);
    let b_rank = type_rank(b);
    if a_rank != b_rank {
        return a_rank.cmp(&b_rank);
    }

    match (a, b) {
        (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
        (Value::Number(a_n), Value::Number(b_n)) => {
            compare_numbers(a_n, b_n).unwrap_or(Ordering::Equal)
        }
        (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
        (Value::Array(a_arr), Value::Array(b_arr)) => {
            for (x, y) in a_arr.iter().zip(b_arr.iter()) {
                let ordering = compare_values(x, y);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a_arr.len().cmp(&b_arr.len())
        }
        // null == null; objects are not ordered among themselves
        _ => Ordering::Equal,
    }
}

/// Partial order used by relational operators.
///
/// Null and mixed-kind pairs are incomparable.
pub fn partial_compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Bool(a_b), Value::Bool(b_b)) => Some(a_b.cmp(b_b)),
        (Value::Number(a_n), Value::Number(b_n)) => compare_numbers(a_n, b_n),
        (Value::String(a_s), Value::String(b_s)) => Some(a_s.cmp(b_s)),
        (Value::Array(a_arr), Value::Array(b_arr)) => {
            for (x, y) in a_arr.iter().zip(b_arr.iter()) {
                match partial_compare(x, y)? {
                    Ordering::Equal => continue,
                    ordering => return Some(ordering),
                }
            }
            Some(a_arr.len().cmp(&b_arr.len()))
        }
        _ => None,
    }
}

/// Equality with numeric comparison across integer and float representations.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a_n), Value::Number(b_n)) => {
            compare_numbers(a_n, b_n) == Some(Ordering::Equal)
        }
        (Value::Array(a_arr), Value::Array(b_arr)) => {
            a_arr.len() == b_arr.len()
                && a_arr.iter().zip(b_arr.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a_map), Value::Object(b_map)) => {
            a_map.len() == b_map.len()
                && a_map
                    .iter()
                    .all(|(k, v)| b_map.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

/// Truthiness: null, false, zero, and empty strings/collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
