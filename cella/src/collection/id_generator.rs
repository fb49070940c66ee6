use crate::collection::Index;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Produces identifiers for documents inserted without one.
///
/// Generated values only need to be unique within one collection with
/// overwhelming probability; the collection still rejects a duplicate.
/// The default generator returns random UUID v4 strings.
///
/// # Examples
///
/// ```rust
/// use cella::collection::{IdGenerator, Index};
/// use std::sync::atomic::{AtomicI64, Ordering};
///
/// let counter = AtomicI64::new(0);
/// let sequential = IdGenerator::new(move || Index::Int(counter.fetch_add(1, Ordering::Relaxed)));
/// assert_eq!(sequential.next_id(), Index::Int(0));
/// assert_eq!(sequential.next_id(), Index::Int(1));
/// ```
#[derive(Clone)]
pub struct IdGenerator {
    inner: Arc<dyn Fn() -> Index + Send + Sync>,
}

impl IdGenerator {
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn() -> Index + Send + Sync + 'static,
    {
        IdGenerator {
            inner: Arc::new(generator),
        }
    }

    /// Returns a generator producing random UUID v4 strings.
    pub fn uuid() -> Self {
        IdGenerator::new(|| Index::Str(uuid::Uuid::new_v4().to_string()))
    }

    pub fn next_id(&self) -> Index {
        (self.inner)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator::uuid()
    }
}

impl Debug for IdGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdGenerator")
    }
}
