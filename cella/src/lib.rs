//! # Cella - Embedded JSON Document Store
//!
//! Cella keeps schema-less JSON documents in named collections, gives each
//! document an identifier unique within its collection, answers point
//! lookups and predicate queries, and persists the whole store to a single
//! JSON file after every mutation.
//!
//! ## Key Features
//!
//! - **Schema-less**: documents are ordered maps of JSON values
//! - **Predicate queries**: field specifications or fluent expressions
//!   combined with AND/OR, evaluated by a linear scan
//! - **Deferred builders**: `find`, `update` and `delete` run on `execute`
//! - **Whole-file persistence**: overwrite in place or atomic replace
//!
//! ## Quick Start
//!
//! ```rust
//! use cella::doc;
//! use cella::filter::{gt, QuerySpec};
//! use cella::store::Store;
//!
//! # fn main() -> cella::errors::CellaResult<()> {
//! let store = Store::in_memory();
//! let test = store.collection("test")?;
//!
//! test.insert_with_id(doc! { "age": 10, "school": "randomSchool", "sex": "M" }, 1)?;
//! test.insert_with_id(doc! { "age": 22, "school": "randomUni", "sex": "M" }, 2)?;
//! test.insert_with_id(doc! { "age": 24, "school": "randomUni", "sex": "F" }, 3)?;
//!
//! let found = test.query(QuerySpec::new().field("age", gt(10)).field("sex", "F"));
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].id(), Some(3.into()));
//!
//! let removed = test.delete(QuerySpec::new().field("sex", "M")).execute()?;
//! assert_eq!(removed, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`collection`] - documents, ids and collections
//! - [`filter`] - the predicate engine
//! - [`query`] - deferred query/update/delete builders
//! - [`store`] - the collection registry and its persistence
//! - [`errors`] - error types

pub mod collection;
pub mod errors;
pub mod filter;
pub mod query;
pub mod store;

pub use serde_json;

/// Reserved field holding the id of a document.
pub const DOC_ID: &str = "_id";

/// Reserved field tagging the owning collection in the serialized form.
pub const DOC_COLLECTION: &str = "_collection";

/// Fields a document update never overwrites.
pub const RESERVED_FIELDS: [&str; 2] = [DOC_ID, DOC_COLLECTION];

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
