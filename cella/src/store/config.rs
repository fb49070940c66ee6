use crate::collection::IdGenerator;
use crate::errors::{CellaError, CellaResult, ErrorKind};
use std::path::{Path, PathBuf};

/// How the store file is rewritten on every commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteStrategy {
    /// Truncate the store file and write the new contents in place.
    #[default]
    Overwrite,
    /// Write the new contents to `<file>.tmp` and rename it over the store
    /// file, so readers see either the old or the new file.
    AtomicReplace,
}

/// Configuration of a [`Store`](crate::store::Store).
///
/// Usually assembled through [`StoreBuilder`](crate::store::StoreBuilder).
/// A configuration without a file path describes an in-memory store that
/// never persists.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    file_path: Option<PathBuf>,
    write_strategy: WriteStrategy,
    pretty_print: bool,
    id_generator: IdGenerator,
}

impl StoreConfig {
    pub fn new() -> Self {
        StoreConfig::default()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Sets the store file location.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::IOError`] for an empty path.
    pub fn set_file_path<P: AsRef<Path>>(&mut self, path: P) -> CellaResult<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            log::error!("Store file path is empty");
            return Err(CellaError::new("The store file path must not be empty", ErrorKind::IOError));
        }
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn write_strategy(&self) -> WriteStrategy {
        self.write_strategy
    }

    pub fn set_write_strategy(&mut self, write_strategy: WriteStrategy) {
        self.write_strategy = write_strategy;
    }

    /// Whether the store file is written indented.
    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    pub fn set_pretty_print(&mut self, pretty_print: bool) {
        self.pretty_print = pretty_print;
    }

    pub fn id_generator(&self) -> &IdGenerator {
        &self.id_generator
    }

    pub fn set_id_generator(&mut self, id_generator: IdGenerator) {
        self.id_generator = id_generator;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Index;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new();
        assert!(config.file_path().is_none());
        assert_eq!(config.write_strategy(), WriteStrategy::Overwrite);
        assert!(!config.pretty_print());
        assert!(matches!(config.id_generator().next_id(), Index::Str(_)));
    }

    #[test]
    fn test_set_file_path() {
        let mut config = StoreConfig::new();
        config.set_file_path("data/store.json").unwrap();
        assert_eq!(config.file_path(), Some(Path::new("data/store.json")));
    }

    #[test]
    fn test_empty_file_path_is_rejected() {
        let mut config = StoreConfig::new();
        let err = config.set_file_path("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IOError);
        assert!(config.file_path().is_none());
    }
}
