//! Deferred query, update and delete builders.
//!
//! A builder is obtained from a [`Collection`](crate::collection::Collection)
//! with `find`, `update` or `delete`, refined with `and`/`or`, and only
//! touches the collection when `execute` runs.

mod delete_query;
mod find_query;
mod update_query;

pub use delete_query::*;
pub use find_query::*;
pub use update_query::*;
