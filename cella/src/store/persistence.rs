//! Whole-file reads and writes of the store file.

use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::store::WriteStrategy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Writes `contents` to `path`, creating missing parent directories.
///
/// Any IO failure is reported as [`ErrorKind::PersistenceError`] with the
/// IO error kept as cause.
pub(crate) fn write_store_file(path: &Path, contents: &str, strategy: WriteStrategy) -> CellaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| persistence_error(path, "create the directory of", e))?;
        }
    }

    match strategy {
        WriteStrategy::Overwrite => {
            fs::write(path, contents).map_err(|e| persistence_error(path, "write", e))?;
        }
        WriteStrategy::AtomicReplace => {
            let tmp_path = temp_path(path);
            fs::write(&tmp_path, contents).map_err(|e| persistence_error(&tmp_path, "write", e))?;
            if let Err(e) = fs::rename(&tmp_path, path) {
                let _ = fs::remove_file(&tmp_path);
                return Err(persistence_error(path, "replace", e));
            }
        }
    }

    log::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Reads the store file, `None` when it does not exist.
pub(crate) fn read_store_file(path: &Path) -> CellaResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            log::error!("Failed to read store file {}: {}", path.display(), e);
            Err(CellaError::new_with_cause(
                &format!("Failed to read store file {}", path.display()),
                ErrorKind::IOError,
                e.into(),
            ))
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn persistence_error(path: &Path, action: &str, cause: io::Error) -> CellaError {
    log::error!("Failed to {} store file {}: {}", action, path.display(), cause);
    CellaError::new_with_cause(
        &format!("Failed to {} store file {}", action, path.display()),
        ErrorKind::PersistenceError,
        cause.into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cella-persistence-{}-{}", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_overwrite_creates_parent_directories() {
        let dir = scratch_dir("overwrite");
        let path = dir.join("nested").join("store.json");
        write_store_file(&path, "[]", WriteStrategy::Overwrite).unwrap();
        write_store_file(&path, "[1]", WriteStrategy::Overwrite).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_atomic_replace_leaves_no_temp_file() {
        let dir = scratch_dir("atomic");
        let path = dir.join("store.json");
        write_store_file(&path, "[]", WriteStrategy::AtomicReplace).unwrap();
        write_store_file(&path, "[2]", WriteStrategy::AtomicReplace).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[2]");
        assert!(!temp_path(&path).exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_write_failure_is_persistence_error() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        fs::write(&blocker, "x").unwrap();

        let err = write_store_file(&blocker.join("store.json"), "[]", WriteStrategy::Overwrite).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::PersistenceError);
        assert!(err.cause().is_some());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let path = scratch_dir("missing").join("store.json");
        assert!(read_store_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(temp_path(Path::new("/a/store.json")), PathBuf::from("/a/store.json.tmp"));
    }
}
