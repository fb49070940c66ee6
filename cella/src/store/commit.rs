use crate::errors::CellaResult;
use std::sync::{Arc, Weak};

/// Receives the commit signal a collection emits after every mutation.
///
/// The store implements this by persisting itself. Collections only ever
/// hold a weak reference, so the store owning them can be dropped freely.
pub trait CommitHook: Send + Sync {
    fn commit(&self) -> CellaResult<()>;
}

/// The commit hook reference handed to a collection at construction.
#[derive(Clone, Default)]
pub(crate) struct CommitHandle {
    hook: Option<Weak<dyn CommitHook>>,
}

impl CommitHandle {
    /// A handle that never commits, for detached collections.
    pub(crate) fn detached() -> Self {
        CommitHandle { hook: None }
    }

    pub(crate) fn new<H: CommitHook + 'static>(hook: &Arc<H>) -> Self {
        let hook: Arc<dyn CommitHook> = hook.clone();
        CommitHandle {
            hook: Some(Arc::downgrade(&hook)),
        }
    }

    /// Invokes the hook if its owner is still alive.
    pub(crate) fn commit(&self) -> CellaResult<()> {
        match self.hook.as_ref().and_then(Weak::upgrade) {
            Some(hook) => hook.commit(),
            None => {
                log::debug!("Commit skipped, no store attached");
                Ok(())
            }
        }
    }
}
