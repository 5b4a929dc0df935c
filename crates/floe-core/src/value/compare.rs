use crate::value::Value;
use std::cmp::Ordering;

///
/// NumericRepr
///

enum NumericRepr {
    Int(i128),
    Float(f64),
}

/// Total canonical comparator used by filtering and ordering surfaces.
///
/// Ordering rules:
/// 1. Canonical variant rank; the numeric variants share one rank and
///    interleave by magnitude, the way native stores order them.
/// 2. Variant-specific comparison for same-ranked values.
///
/// Mixed-rank comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => 2,
        Value::Timestamp(_) => 3,
        Value::Text(_) => 4,
        Value::Blob(_) => 5,
        Value::List(_) => 6,
        Value::Map(_) => 7,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Blob(a), Value::Blob(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        (Value::Map(a), Value::Map(b)) => canonical_cmp_map(a, b),
        (Value::Null, Value::Null) => Ordering::Equal,
        // Remaining same-rank pairs are numeric.
        (a, b) => cmp_numeric(a, b),
    }
}

fn cmp_numeric(left: &Value, right: &Value) -> Ordering {
    match (numeric_repr(left), numeric_repr(right)) {
        (Some(a), Some(b)) => cmp_repr(&a, &b),
        _ => Ordering::Equal,
    }
}

fn numeric_repr(value: &Value) -> Option<NumericRepr> {
    match value {
        Value::Int(n) => Some(NumericRepr::Int(i128::from(*n))),
        Value::Uint(n) => Some(NumericRepr::Int(i128::from(*n))),
        Value::Float(f) => Some(NumericRepr::Float(*f)),
        _ => None,
    }
}

fn cmp_repr(left: &NumericRepr, right: &NumericRepr) -> Ordering {
    match (left, right) {
        (NumericRepr::Int(a), NumericRepr::Int(b)) => a.cmp(b),
        (NumericRepr::Float(a), NumericRepr::Float(b)) => a.total_cmp(b),
        (NumericRepr::Int(a), NumericRepr::Float(b)) => cmp_int_float(*a, *b),
        (NumericRepr::Float(a), NumericRepr::Int(b)) => cmp_int_float(*b, *a).reverse(),
    }
}

// NaN sorts above every number; the int cast is lossy above 2^53, which
// mixed-type ordering tolerates.
#[allow(clippy::cast_precision_loss)]
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Less;
    }

    (int as f64).total_cmp(&float)
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn canonical_cmp_map(left: &[(String, Value)], right: &[(String, Value)]) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.iter().zip(right.iter()) {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.len().cmp(&right.len())
}
