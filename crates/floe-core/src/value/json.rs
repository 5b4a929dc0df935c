use crate::value::Value;
use thiserror::Error as ThisError;

///
/// ValueJsonError
///
/// Values that have no JSON projection. Packing is loud about these;
/// nothing is silently dropped or nulled.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueJsonError {
    #[error("non-finite float has no JSON form")]
    NonFiniteFloat,

    #[error("timestamp has no JSON form: {message}")]
    Timestamp { message: String },
}

/// Convert a JSON value into the canonical `Value` form.
///
/// Objects become sorted maps. Integral numbers become `Int` when they
/// fit a signed 64-bit, `Uint` otherwise; everything else stays `Float`.
#[must_use]
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => {
            Value::map(entries.iter().map(|(key, value)| (key.clone(), from_json(value))))
        }
    }
}

/// Convert a `Value` into its canonical JSON projection.
///
/// Timestamps become RFC 3339 strings and blobs become byte arrays, so
/// both are lossy across a JSON round trip: they restore as `Text` and
/// a `List` of small integers.
pub fn to_json(value: &Value) -> Result<serde_json::Value, ValueJsonError> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Uint(u) => serde_json::Value::from(*u),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(ValueJsonError::NonFiniteFloat)?,
        Value::Text(s) => serde_json::Value::from(s.as_str()),
        Value::Timestamp(ts) => {
            let formatted = ts.format_rfc3339().map_err(|err| ValueJsonError::Timestamp {
                message: err.to_string(),
            })?;
            serde_json::Value::from(formatted)
        }
        Value::Blob(bytes) => {
            serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
        }
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Map(entries) => {
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                out.insert(key.clone(), to_json(value)?);
            }
            serde_json::Value::Object(out)
        }
    };

    Ok(json)
}
