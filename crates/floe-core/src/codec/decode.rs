//! Module: codec::decode
//! Responsibility: rebuild records from raw store rows, unpacking the
//! fields the sidecar names (or sniffing brace-prefixed text on legacy
//! rows without one).

use crate::{
    codec::PACKED_FIELD,
    query::{FlatProps, RawRow},
    record::{ID_FIELD, Record},
    value::{self, Value},
};
use thiserror::Error as ThisError;

///
/// DecodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("row in {collection} has no identifier in its key")]
    MissingIdentifier { collection: String },

    #[error("cannot unpack field {field}: {message}")]
    Packed { field: String, message: String },

    #[error("malformed packing sidecar: {message}")]
    Sidecar { message: String },
}

/// Rebuild one record from a raw row. The identifier comes from the key;
/// packed fields are restored per the sidecar. Rows written without a
/// sidecar fall back to sniffing: any text value starting with `{` is
/// tried as JSON, so text that happens to look like an object decodes
/// as one.
pub fn decode_row(row: RawRow) -> Result<Record, DecodeError> {
    let (collection, id) = row.key.into_parts();
    let Some(id) = id else {
        return Err(DecodeError::MissingIdentifier {
            collection: collection.into_string(),
        });
    };

    let mut props = row.props;

    match take_sidecar(&mut props)? {
        Some(packed) => {
            for field in &packed {
                unpack_field(&mut props, field)?;
            }
        }
        None => {
            // legacy rows carry no sidecar; sniff every text value
            for prop in props.values_mut() {
                sniff_object_text(prop);
            }
        }
    }

    // a stray identifier property must not shadow the key
    props.remove(ID_FIELD);

    Ok(Record::from_parts(Some(id), props))
}

/// Decode a page of rows. The first bad row fails the whole batch.
pub fn decode_rows(rows: Vec<RawRow>) -> Result<Vec<Record>, DecodeError> {
    rows.into_iter().map(decode_row).collect()
}

fn take_sidecar(props: &mut FlatProps) -> Result<Option<Vec<String>>, DecodeError> {
    let Some(sidecar) = props.remove(PACKED_FIELD) else {
        return Ok(None);
    };

    let text = match sidecar {
        Value::Text(text) => text,
        other => {
            return Err(DecodeError::Sidecar {
                message: format!("expected text, found {}", other.type_name()),
            });
        }
    };

    let packed: Vec<String> =
        serde_json::from_str(&text).map_err(|err| DecodeError::Sidecar {
            message: err.to_string(),
        })?;

    Ok(Some(packed))
}

fn unpack_field(props: &mut FlatProps, field: &str) -> Result<(), DecodeError> {
    // a projection may have dropped a listed field; nothing to unpack then
    let Some(prop) = props.get_mut(field) else {
        return Ok(());
    };

    let json = match prop {
        Value::Text(text) => {
            serde_json::from_str::<serde_json::Value>(text).map_err(|err| DecodeError::Packed {
                field: field.to_string(),
                message: err.to_string(),
            })?
        }
        other => {
            return Err(DecodeError::Packed {
                field: field.to_string(),
                message: format!("expected text, found {}", other.type_name()),
            });
        }
    };

    *prop = value::from_json(&json);

    Ok(())
}

/// Try brace-prefixed text as JSON; keep the text when it does not parse.
fn sniff_object_text(prop: &mut Value) {
    let text = match prop {
        Value::Text(text) => text,
        _ => return,
    };
    if !text.starts_with('{') {
        return;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        *prop = value::from_json(&json);
    }
}
