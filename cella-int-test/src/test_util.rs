use cella::errors::{CellaError, CellaResult, ErrorKind};
use cella::store::{Store, WriteStrategy};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Runs `test` between `before` and `after`.
///
/// `after` runs even when the test fails or panics, so scratch files are
/// always removed. A failing phase fails the test with its error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> CellaResult<()>,
    B: Fn() -> CellaResult<TestContext>,
    A: Fn(TestContext) -> CellaResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Before run failed: {}", e);
            panic!("Before run failed: {:?}", e)
        }
    };

    let test_ctx = ctx.clone();
    let result = panic::catch_unwind(AssertUnwindSafe(move || test(test_ctx)));
    let after_result = after(ctx);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("Test failed: {}", e);
            panic!("Test failed: {:?}", e)
        }
        Err(panic_payload) => panic::resume_unwind(panic_payload),
    }
    if let Err(e) = after_result {
        log::error!("After run failed: {}", e);
        panic!("After run failed: {:?}", e);
    }
}

/// A store opened on a scratch file.
#[derive(Clone)]
pub struct TestContext {
    path: PathBuf,
    store: Store,
}

impl TestContext {
    pub fn new(path: PathBuf, store: Store) -> Self {
        Self { path, store }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> Store {
        self.store.clone()
    }

    /// Opens a second, independent store on the same file.
    pub fn reopen(&self) -> CellaResult<Store> {
        Store::open(&self.path)
    }

    /// Current contents of the store file.
    pub fn file_contents(&self) -> CellaResult<String> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// A store file path inside a fresh directory under the system temp dir.
pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    std::env::temp_dir()
        .join(format!("cella-{}", id))
        .join("store.json")
}

pub fn create_test_context() -> CellaResult<TestContext> {
    create_context_with(WriteStrategy::Overwrite)
}

pub fn create_atomic_test_context() -> CellaResult<TestContext> {
    create_context_with(WriteStrategy::AtomicReplace)
}

fn create_context_with(write_strategy: WriteStrategy) -> CellaResult<TestContext> {
    let path = random_path();
    let store = Store::builder()
        .file_path(&path)
        .write_strategy(write_strategy)
        .open()?;
    Ok(TestContext::new(path, store))
}

/// Writes `contents` as the store file of a fresh context path without
/// opening it.
pub fn prepare_file(contents: &str) -> CellaResult<PathBuf> {
    let path = random_path();
    let parent = path
        .parent()
        .ok_or_else(|| CellaError::new("scratch path has no parent", ErrorKind::InternalError))?;
    fs::create_dir_all(parent)?;
    fs::write(&path, contents)?;
    Ok(path)
}

pub fn cleanup(ctx: TestContext) -> CellaResult<()> {
    remove_scratch(ctx.path())
}

pub fn remove_scratch(path: &Path) -> CellaResult<()> {
    if let Some(dir) = path.parent() {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Test failed")]
    fn test_failing_test_phase_panics_after_cleanup() {
        run_test(
            create_test_context,
            |ctx| {
                ctx.store().collection("")?;
                Ok(())
            },
            cleanup,
        )
    }

    #[test]
    #[should_panic(expected = "Before run failed")]
    fn test_failing_before_phase_panics() {
        run_test(
            || Err(CellaError::new("no context", ErrorKind::InternalError)),
            |_| Ok(()),
            cleanup,
        )
    }
}
