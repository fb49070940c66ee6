use crate::collection::Collection;
use crate::errors::CellaResult;
use crate::filter::{Expression, QuerySpec};

/// A deferred removal over one collection.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::filter::{lt, QuerySpec};
/// use cella::store::Store;
///
/// let store = Store::in_memory();
/// let test = store.collection("test").unwrap();
/// test.insert_with_id(doc! { "age": 10 }, 1).unwrap();
/// test.insert_with_id(doc! { "age": 22 }, 2).unwrap();
///
/// let removed = test.delete(QuerySpec::new().field("age", lt(18))).execute().unwrap();
/// assert_eq!(removed, 1);
/// assert!(test.get(1).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Delete {
    collection: Collection,
    expression: Expression,
}

impl Delete {
    pub(crate) fn new(collection: Collection, expression: Expression) -> Self {
        Delete { collection, expression }
    }

    /// Narrows the removal: documents must also match `spec`.
    pub fn and(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.and(spec.parse());
        self
    }

    /// Widens the removal: documents matching `spec` are also removed.
    pub fn or(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.or(spec.parse());
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Removes the matching documents and returns how many were removed.
    pub fn execute(&self) -> CellaResult<usize> {
        self.collection.delete_matching(&self.expression)
    }
}
