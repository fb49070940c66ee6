use crate::collection::Collection;
use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::store::commit::{CommitHandle, CommitHook};
use crate::store::persistence::{read_store_file, write_store_file};
use crate::store::serialized::parse_entries;
use crate::store::{StoreBuilder, StoreConfig};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A registry of named collections with optional whole-file persistence.
///
/// Collections are created lazily on first reference and live as long as
/// the store. When a file path is configured, every mutation of any
/// collection rewrites the whole file as a JSON array of entries
/// `{ "_id", "_collection", ...fields }`. Opening a store on an existing
/// file loads those entries back without rewriting the file.
///
/// `Store` is a cheap handle; clones share the same collections.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::store::Store;
///
/// let store = Store::in_memory();
/// let users = store.collection("users").unwrap();
/// users.insert_with_id(doc! { "name": "Ann" }, "ann").unwrap();
///
/// assert_eq!(store.collection_names(), vec!["users".to_string()]);
/// assert!(store.serialize().unwrap().contains(r#""_collection":"users""#));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    config: StoreConfig,
    collections: RwLock<IndexMap<String, Collection>>,
}

impl Store {
    /// Creates an empty store that never persists.
    pub fn in_memory() -> Self {
        Store::new(StoreConfig::new())
    }

    /// Opens the store file at `path`, or starts an empty store that will
    /// be written there on the first mutation.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::IOError`] if the file exists but cannot be read
    /// * [`ErrorKind::EncodingError`] if it is not valid JSON
    /// * [`ErrorKind::SchemaError`] if its top level is not an array
    /// * [`ErrorKind::ItemValidationError`] for a malformed entry
    /// * [`ErrorKind::InsertionError`] for an id repeated in one collection
    pub fn open<P: AsRef<Path>>(path: P) -> CellaResult<Self> {
        Store::builder().file_path(path).open()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Opens a store from a configuration, loading its file if present.
    pub fn with_config(config: StoreConfig) -> CellaResult<Self> {
        let contents = match config.file_path() {
            Some(path) => read_store_file(path)?,
            None => None,
        };

        let store = Store::new(config);
        if let Some(contents) = contents {
            let value: Value = serde_json::from_str(&contents).map_err(|e| {
                log::error!("Store file {:?} is not valid JSON: {}", store.path(), e);
                CellaError::from(e)
            })?;
            store.load(value)?;
        }
        Ok(store)
    }

    /// Builds a store from already parsed entries.
    ///
    /// The entries are validated like a loaded file. When `path` is given,
    /// later mutations persist there; the entries themselves are not written
    /// until then.
    pub fn from_entries(entries: Value, path: Option<PathBuf>) -> CellaResult<Self> {
        let mut config = StoreConfig::new();
        if let Some(path) = path {
            config.set_file_path(path)?;
        }
        let store = Store::new(config);
        store.load(entries)?;
        Ok(store)
    }

    fn new(config: StoreConfig) -> Self {
        Store {
            inner: Arc::new(StoreInner {
                config,
                collections: RwLock::new(IndexMap::new()),
            }),
        }
    }

    /// Returns the collection named `name`, creating it if needed.
    ///
    /// Creating a collection does not write the store file; it appears there
    /// once it holds a document.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::InvalidCollectionName`] for an empty name.
    pub fn collection(&self, name: &str) -> CellaResult<Collection> {
        if name.is_empty() {
            log::error!("Empty collection name requested");
            return Err(CellaError::new(
                "A collection name must not be empty",
                ErrorKind::InvalidCollectionName,
            ));
        }

        if let Some(collection) = self.inner.collections.read().get(name) {
            return Ok(collection.clone());
        }

        let mut collections = self.inner.collections.write();
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Creating collection {}", name);
                Collection::new(
                    name,
                    CommitHandle::new(&self.inner),
                    self.inner.config.id_generator().clone(),
                )
            })
            .clone();
        Ok(collection)
    }

    /// Returns an existing collection without creating one.
    pub fn get_collection(&self, name: &str) -> Option<Collection> {
        self.inner.collections.read().get(name).cloned()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.read().contains_key(name)
    }

    /// Collection names in creation order.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.read().keys().cloned().collect()
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.config.file_path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Serializes every document of every collection into one JSON array.
    ///
    /// Entries follow collection creation order, then insertion order, so
    /// the output is stable while the store is unchanged.
    pub fn serialize(&self) -> CellaResult<String> {
        self.inner.serialize()
    }

    /// Rewrites the store file. Does nothing for an in-memory store.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::PersistenceError`] if the directory or the
    /// file cannot be written.
    pub fn persist(&self) -> CellaResult<()> {
        self.inner.persist()
    }

    fn load(&self, entries: Value) -> CellaResult<()> {
        let entries = parse_entries(entries)?;
        let count = entries.len();
        for entry in entries {
            self.collection(&entry.collection)?.load(entry.id, entry.document)?;
        }
        log::info!(
            "Loaded {} documents into {} collections",
            count,
            self.inner.collections.read().len()
        );
        Ok(())
    }
}

impl StoreInner {
    fn serialize(&self) -> CellaResult<String> {
        let mut entries = Vec::new();
        for (name, collection) in self.collections.read().iter() {
            collection.for_each(|document| entries.push(document.to_entry(name)));
        }

        let entries = Value::Array(entries);
        let json = if self.config.pretty_print() {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        };
        Ok(json)
    }

    fn persist(&self) -> CellaResult<()> {
        let path = match self.config.file_path() {
            Some(path) => path,
            None => return Ok(()),
        };
        let contents = self.serialize()?;
        write_store_file(path, &contents, self.config.write_strategy())
    }
}

impl CommitHook for StoreInner {
    fn commit(&self) -> CellaResult<()> {
        log::debug!("Committing store {:?}", self.config.file_path());
        self.persist()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path())
            .field("collections", &self.collection_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Index;
    use crate::doc;
    use serde_json::json;
    use std::collections::HashSet;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("cella-store-{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    fn entry_set(json: &str) -> HashSet<String> {
        let value: Value = serde_json::from_str(json).unwrap();
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry.to_string())
            .collect()
    }

    #[test]
    fn test_collection_is_idempotent_by_name() {
        let store = Store::in_memory();
        let first = store.collection("test").unwrap();
        first.insert_with_id(doc! { "a": 1 }, 1).unwrap();
        let second = store.collection("test").unwrap();
        assert_eq!(second.count(), 1);
        assert_eq!(store.collection_names(), vec!["test".to_string()]);
    }

    #[test]
    fn test_empty_collection_name_is_rejected() {
        let store = Store::in_memory();
        let err = store.collection("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidCollectionName);
        assert!(store.collection_names().is_empty());
    }

    #[test]
    fn test_get_collection_does_not_create() {
        let store = Store::in_memory();
        assert!(store.get_collection("ghost").is_none());
        assert!(!store.has_collection("ghost"));
        store.collection("ghost").unwrap();
        assert!(store.has_collection("ghost"));
    }

    #[test]
    fn test_ids_are_scoped_per_collection() {
        let store = Store::in_memory();
        store.collection("a").unwrap().insert_with_id(doc! {}, 1).unwrap();
        assert!(store.collection("b").unwrap().insert_with_id(doc! {}, 1).is_ok());
    }

    #[test]
    fn test_serialize_order_and_tags() {
        let store = Store::in_memory();
        let b = store.collection("b").unwrap();
        let a = store.collection("a").unwrap();
        b.insert_with_id(doc! { "n": 1 }, 1).unwrap();
        a.insert_with_id(doc! { "n": 2 }, "x").unwrap();
        b.insert_with_id(doc! { "n": 3 }, 2).unwrap();

        let json = store.serialize().unwrap();
        assert_eq!(
            json,
            r#"[{"_id":1,"_collection":"b","n":1},{"_id":2,"_collection":"b","n":3},{"_id":"x","_collection":"a","n":2}]"#
        );
        assert_eq!(store.serialize().unwrap(), json);
    }

    #[test]
    fn test_round_trip_through_entries() {
        let store = Store::in_memory();
        let test = store.collection("test").unwrap();
        test.insert_with_id(doc! { "age": 10, "nested": { "x": [1, 2] } }, 1).unwrap();
        test.insert(doc! { "age": 22 }).unwrap();
        store.collection("other").unwrap().insert_with_id(doc! { "ok": true }, "k").unwrap();

        let first = store.serialize().unwrap();
        let reloaded = Store::from_entries(serde_json::from_str(&first).unwrap(), None).unwrap();
        let second = reloaded.serialize().unwrap();

        assert_eq!(entry_set(&first), entry_set(&second));
        assert_eq!(reloaded.collection("test").unwrap().count(), 2);
        assert_eq!(
            reloaded.collection("other").unwrap().get("k").unwrap(),
            doc! { "_id": "k", "ok": true }
        );
    }

    #[test]
    fn test_from_entries_rejects_duplicate_ids() {
        let err = Store::from_entries(
            json!([
                {"_id": 1, "_collection": "test"},
                {"_id": 1, "_collection": "test"},
            ]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InsertionError);
    }

    #[test]
    fn test_from_entries_does_not_persist() {
        let path = scratch_path();
        let store = Store::from_entries(json!([{"_id": 1, "_collection": "t"}]), Some(path.clone())).unwrap();
        assert!(!path.exists());

        store.collection("t").unwrap().insert_with_id(doc! {}, 2).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_mutation_persists_and_reopens() {
        let path = scratch_path();
        {
            let store = Store::open(&path).unwrap();
            assert!(!path.exists());
            store.collection("test").unwrap().insert_with_id(doc! { "age": 10 }, 1).unwrap();
        }

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.collection_names(), vec!["test".to_string()]);
        assert_eq!(
            reopened.collection("test").unwrap().get(1).unwrap(),
            doc! { "_id": 1, "age": 10 }
        );
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_open_invalid_json_is_encoding_error() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Store::open(&path).unwrap_err().kind(), &ErrorKind::EncodingError);
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_pretty_print() {
        let path = scratch_path();
        let store = Store::builder().file_path(&path).pretty_print(true).open().unwrap();
        store.collection("t").unwrap().insert_with_id(doc! { "a": 1 }, 1).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains('\n'));
        assert_eq!(entry_set(&contents), entry_set(r#"[{"_id":1,"_collection":"t","a":1}]"#));
        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_collection_outliving_store_commits_nothing() {
        let collection = {
            let store = Store::in_memory();
            store.collection("t").unwrap()
        };
        assert_eq!(collection.insert_with_id(doc! {}, 1).unwrap(), Index::Int(1));
    }
}
