//! Documents, their identifiers and the collections holding them.

mod document;
mod document_collection;
mod id_generator;
mod index;

pub use document::*;
pub use document_collection::*;
pub use id_generator::*;
pub use index::*;
