use crate::collection::IdGenerator;
use crate::errors::{CellaError, CellaResult};
use crate::store::{Store, StoreConfig, WriteStrategy};
use std::path::Path;

/// Fluent builder for a [`Store`].
///
/// The first configuration error is kept and returned by
/// [`open`](StoreBuilder::open); later settings are ignored once an error
/// has been recorded.
///
/// # Examples
///
/// ```rust
/// use cella::store::{Store, WriteStrategy};
///
/// let dir = std::env::temp_dir().join(format!("cella-doc-{}", std::process::id()));
/// let store = Store::builder()
///     .file_path(dir.join("store.json"))
///     .write_strategy(WriteStrategy::AtomicReplace)
///     .pretty_print(true)
///     .open()
///     .unwrap();
/// assert!(store.collection_names().is_empty());
/// # let _ = std::fs::remove_dir_all(dir);
/// ```
#[derive(Default)]
pub struct StoreBuilder {
    error: Option<CellaError>,
    config: StoreConfig,
}

impl StoreBuilder {
    pub fn new() -> Self {
        StoreBuilder {
            error: None,
            config: StoreConfig::new(),
        }
    }

    /// Sets the file the store loads from and persists to.
    pub fn file_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_file_path(path) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn write_strategy(mut self, write_strategy: WriteStrategy) -> Self {
        self.config.set_write_strategy(write_strategy);
        self
    }

    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        self.config.set_pretty_print(pretty_print);
        self
    }

    /// Replaces the generator used for documents inserted without an id.
    pub fn id_generator(mut self, id_generator: IdGenerator) -> Self {
        self.config.set_id_generator(id_generator);
        self
    }

    /// Opens the store, loading the file if one exists at the configured path.
    pub fn open(self) -> CellaResult<Store> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Store::with_config(self.config)
    }
}
