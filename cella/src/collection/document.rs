use crate::collection::Index;
use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::{DOC_COLLECTION, DOC_ID, RESERVED_FIELDS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Display};

/// A schema-less record stored in a collection.
///
/// A document is an insertion-ordered map from field names to JSON values.
/// Once stored in a collection it always carries its [`Index`] under the
/// reserved `_id` field, placed first.
///
/// Below fields are reserved:
///
/// * `_id` - the identifier of the document inside its collection. It can
///   be set before insertion to choose the id, otherwise one is generated.
/// * `_collection` - used by the serialized form to tag the owning
///   collection. Documents must not carry it.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use serde_json::json;
///
/// let mut doc = doc! { "name": "Alice", "age": 30 };
/// doc.put("city", "Lisbon");
/// assert_eq!(doc.get("age"), Some(&json!(30)));
/// assert_eq!(doc.size(), 3);
/// ```
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document { fields: Map::new() }
    }

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::EncodingError`] when the value is not a JSON object.
    pub fn from_value(value: Value) -> CellaResult<Self> {
        match value {
            Value::Object(fields) => Ok(Document { fields }),
            other => {
                log::error!("Cannot create a document from non-object value {}", other);
                Err(CellaError::new(
                    &format!("A document must be a JSON object, found {}", other),
                    ErrorKind::EncodingError,
                ))
            }
        }
    }

    #[doc(hidden)]
    pub fn from_json_object(value: Value) -> Self {
        match value {
            Value::Object(fields) => Document { fields },
            _ => Document::new(),
        }
    }

    /// Returns `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields, `_id` included.
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// Returns the document for chaining.
    pub fn put<V: Into<Value>>(&mut self, key: &str, value: V) -> &mut Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Removes a field and returns its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the document id if `_id` holds a string or an integer.
    pub fn id(&self) -> Option<Index> {
        self.fields.get(DOC_ID).and_then(Index::from_value)
    }

    /// Returns `true` if the document carries an `_id` field of any shape.
    pub fn has_id(&self) -> bool {
        self.fields.contains_key(DOC_ID)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Field/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Shallow merge of `update` into this document.
    ///
    /// Every top-level field of `update` overwrites the field of the same
    /// name here. Reserved fields are never overwritten; they are skipped
    /// and their names returned so the caller can report them.
    pub fn merge(&mut self, update: &Document) -> Vec<String> {
        let mut skipped = Vec::new();
        for (key, value) in update.iter() {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                skipped.push(key.clone());
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
        skipped
    }

    /// Returns a copy that keeps only `_id` and the named fields.
    pub fn project(&self, field_names: &[&str]) -> Document {
        let fields = self
            .fields
            .iter()
            .filter(|(key, _)| key.as_str() == DOC_ID || field_names.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Document { fields }
    }

    /// Rebuilds the document with `_id` set to `id` as its first field.
    pub(crate) fn with_id(self, id: &Index) -> Document {
        let mut fields = Map::with_capacity(self.fields.len() + 1);
        fields.insert(DOC_ID.to_string(), id.to_value());
        for (key, value) in self.fields {
            if key != DOC_ID {
                fields.insert(key, value);
            }
        }
        Document { fields }
    }

    /// Builds the serialized entry `{_id, _collection, ...fields}`.
    pub(crate) fn to_entry(&self, collection_name: &str) -> Value {
        let mut entry = Map::with_capacity(self.fields.len() + 1);
        if let Some(id) = self.fields.get(DOC_ID) {
            entry.insert(DOC_ID.to_string(), id.clone());
        }
        entry.insert(DOC_COLLECTION.to_string(), Value::from(collection_name));
        for (key, value) in self.fields.iter() {
            if key != DOC_ID {
                entry.insert(key.clone(), value.clone());
            }
        }
        Value::Object(entry)
    }

    /// Converts the document into a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Consumes the document and returns its underlying JSON map.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Document { fields }
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.fields)
    }
}

impl TryFrom<Value> for Document {
    type Error = CellaError;

    fn try_from(value: Value) -> CellaResult<Self> {
        Document::from_value(value)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.fields) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document{}", self)
    }
}

/// Creates a [`Document`] from JSON-like field syntax.
///
/// Keys are string literals, values anything [`serde_json::json!`] accepts.
///
/// ```rust
/// use cella::doc;
///
/// let doc = doc! {
///     "name": "Alice",
///     "address": { "city": "Lisbon" },
///     "tags": ["a", "b"],
/// };
/// assert_eq!(doc.size(), 3);
/// assert!(doc!{}.is_empty());
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };
    ($($body:tt)+) => {
        $crate::collection::Document::from_json_object($crate::serde_json::json!({ $($body)+ }))
    };
}
