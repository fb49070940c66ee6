//! The store: a registry of collections persisted as one JSON file.
//!
//! Every mutation of a collection signals its store through a
//! [`CommitHook`], and the store rewrites its whole file using the
//! configured [`WriteStrategy`].

mod builder;
mod commit;
mod config;
mod document_store;
mod persistence;
mod serialized;

pub use builder::*;
pub use commit::CommitHook;
pub(crate) use commit::CommitHandle;
pub use config::*;
pub use document_store::*;
