//! Module: codec::encode
//! Responsibility: flatten a record into a store key plus flat
//! properties, packing structured values as JSON text.

use crate::{
    codec::PACKED_FIELD,
    key::{CollectionName, RecordKey},
    query::FlatProps,
    record::{ID_FIELD, Record, RecordId},
    value::{self, Value},
};
use thiserror::Error as ThisError;

///
/// EncodeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EncodeError {
    #[error("cannot pack field {field}: {message}")]
    Pack { field: String, message: String },

    #[error("record identifier must not be empty")]
    EmptyIdentifier,

    #[error("_id field does not have an identifier form: {found}")]
    InvalidIdField { found: &'static str },

    #[error("field name is reserved: {field}")]
    ReservedField { field: String },
}

/// Flatten a record for storage. The identifier moves into the key;
/// structured values become JSON text properties and their field names
/// are listed in the packing sidecar. The record itself is untouched.
pub fn encode(
    collection: &CollectionName,
    record: &Record,
) -> Result<(RecordKey, FlatProps), EncodeError> {
    let key = derive_key(collection, record)?;

    let mut props = FlatProps::new();
    let mut packed: Vec<String> = Vec::new();

    for (field, field_value) in record.fields() {
        if field == ID_FIELD {
            continue; // identifier already captured in the key
        }
        if field == PACKED_FIELD {
            return Err(EncodeError::ReservedField {
                field: field.clone(),
            });
        }

        if field_value.is_structured() {
            props.insert(field.clone(), pack_value(field, field_value)?);
            packed.push(field.clone());
        } else {
            props.insert(field.clone(), field_value.clone());
        }
    }

    if !packed.is_empty() {
        props.insert(PACKED_FIELD.to_string(), pack_sidecar(&packed)?);
    }

    Ok((key, props))
}

/// An explicit identifier wins; otherwise the `_id` field supplies one;
/// otherwise the key stays incomplete and the store assigns it.
fn derive_key(collection: &CollectionName, record: &Record) -> Result<RecordKey, EncodeError> {
    let id = match record.id() {
        Some(id) => Some(id.clone()),
        None => match record.get(ID_FIELD) {
            Some(field_value) => Some(RecordId::from_value(field_value).ok_or(
                EncodeError::InvalidIdField {
                    found: field_value.type_name(),
                },
            )?),
            None => None,
        },
    };

    match id {
        Some(id) => RecordKey::complete(collection.clone(), id)
            .map_err(|_| EncodeError::EmptyIdentifier),
        None => Ok(RecordKey::incomplete(collection.clone())),
    }
}

fn pack_value(field: &str, field_value: &Value) -> Result<Value, EncodeError> {
    let json = value::to_json(field_value).map_err(|err| EncodeError::Pack {
        field: field.to_string(),
        message: err.to_string(),
    })?;
    let text = serde_json::to_string(&json).map_err(|err| EncodeError::Pack {
        field: field.to_string(),
        message: err.to_string(),
    })?;

    Ok(Value::Text(text))
}

fn pack_sidecar(packed: &[String]) -> Result<Value, EncodeError> {
    let text = serde_json::to_string(packed).map_err(|err| EncodeError::Pack {
        field: PACKED_FIELD.to_string(),
        message: err.to_string(),
    })?;

    Ok(Value::Text(text))
}
