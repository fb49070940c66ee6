use crate::collection::{Document, Index};
use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::{DOC_COLLECTION, DOC_ID};
use serde_json::{Map, Value};

/// One validated entry of the serialized store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SerializedEntry {
    pub(crate) collection: String,
    pub(crate) id: Index,
    pub(crate) document: Document,
}

/// Validates the serialized form of a store.
///
/// The value must be an array ([`ErrorKind::SchemaError`] otherwise) of
/// objects each carrying a non-empty string or integer `_id` and a
/// non-empty string `_collection` ([`ErrorKind::ItemValidationError`]
/// otherwise). The `_collection` tag is stripped from the returned
/// documents.
pub(crate) fn parse_entries(value: Value) -> CellaResult<Vec<SerializedEntry>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            log::error!("Serialized store is not an array: {}", kind_of(&other));
            return Err(CellaError::new(
                &format!("The store data must be a JSON array, found {}", kind_of(&other)),
                ErrorKind::SchemaError,
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| parse_entry(position, item))
        .collect()
}

fn parse_entry(position: usize, item: Value) -> CellaResult<SerializedEntry> {
    let mut fields: Map<String, Value> = match item {
        Value::Object(fields) => fields,
        other => {
            return Err(invalid_item(
                position,
                &format!("expected an object, found {}", kind_of(&other)),
            ))
        }
    };

    let id = match fields.get(DOC_ID) {
        None => return Err(invalid_item(position, "missing _id")),
        Some(value) => match Index::from_value(value) {
            Some(id) if !id.is_empty() => id,
            Some(_) => return Err(invalid_item(position, "_id is an empty string")),
            None => {
                return Err(invalid_item(
                    position,
                    &format!("_id must be an integer or a string, found {}", value),
                ))
            }
        },
    };

    let collection = match fields.shift_remove(DOC_COLLECTION) {
        None => return Err(invalid_item(position, "missing _collection")),
        Some(Value::String(name)) if !name.is_empty() => name,
        Some(Value::String(_)) => return Err(invalid_item(position, "_collection is an empty string")),
        Some(other) => {
            return Err(invalid_item(
                position,
                &format!("_collection must be a string, found {}", other),
            ))
        }
    };

    Ok(SerializedEntry {
        collection,
        id,
        document: Document::from(fields),
    })
}

fn invalid_item(position: usize, reason: &str) -> CellaError {
    log::error!("Invalid store item at position {}: {}", position, reason);
    CellaError::new(
        &format!("Invalid item at position {}: {}", position, reason),
        ErrorKind::ItemValidationError,
    )
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
