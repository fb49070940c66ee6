use crate::errors::{CellaError, CellaResult, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// The identifier of a document inside one collection.
///
/// An index is either an integer or a string. `Index::Int(1)` and
/// `Index::Str("1".into())` are different identifiers. Uniqueness is only
/// enforced per collection, two collections may hold the same index.
///
/// Serialized untagged, so `Index::Int(7)` is written as `7` and
/// `Index::Str("a".into())` as `"a"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Index {
    Int(i64),
    Str(String),
}

impl Index {
    /// Reads an index out of a JSON value.
    ///
    /// Returns `None` when the value is neither a string nor an integral
    /// number representable as `i64`. Emptiness is not checked here.
    pub fn from_value(value: &Value) -> Option<Index> {
        match value {
            Value::String(s) => Some(Index::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(Index::Int),
            _ => None,
        }
    }

    /// Converts the index into the JSON value stored under `_id`.
    pub fn to_value(&self) -> Value {
        match self {
            Index::Int(i) => Value::from(*i),
            Index::Str(s) => Value::from(s.as_str()),
        }
    }

    /// Returns `true` for the empty string index.
    pub fn is_empty(&self) -> bool {
        matches!(self, Index::Str(s) if s.is_empty())
    }

    /// Parses a textual index as typed by a user. Text in canonical integer
    /// form becomes an integer index, anything else (`"007"`, `"+5"`) a
    /// string index.
    pub fn parse(text: &str) -> Index {
        match text.parse::<i64>() {
            Ok(i) if i.to_string() == text => Index::Int(i),
            _ => Index::Str(text.to_string()),
        }
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Index::Int(i) => write!(f, "{}", i),
            Index::Str(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Index {
    fn from(value: i64) -> Self {
        Index::Int(value)
    }
}

impl From<i32> for Index {
    fn from(value: i32) -> Self {
        Index::Int(value as i64)
    }
}

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Index::Int(value as i64)
    }
}

impl From<String> for Index {
    fn from(value: String) -> Self {
        Index::Str(value)
    }
}

impl From<&str> for Index {
    fn from(value: &str) -> Self {
        Index::Str(value.to_string())
    }
}

impl From<&Index> for Index {
    fn from(value: &Index) -> Self {
        value.clone()
    }
}

impl TryFrom<&Value> for Index {
    type Error = CellaError;

    fn try_from(value: &Value) -> CellaResult<Self> {
        Index::from_value(value).ok_or_else(|| {
            log::error!("Value {} cannot be used as a document id", value);
            CellaError::new(
                &format!("The id of an item must be an integer or a string, found {}", value),
                ErrorKind::InsertionError,
            )
        })
    }
}
