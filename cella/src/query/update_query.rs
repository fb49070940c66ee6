use crate::collection::{Collection, Document};
use crate::errors::CellaResult;
use crate::filter::{Expression, QuerySpec};

/// A deferred partial update over one collection.
///
/// Holds a predicate and the fields to merge. [`execute`](Update::execute)
/// shallow-merges the payload into every matching document and commits
/// once.
#[derive(Debug, Clone)]
pub struct Update {
    collection: Collection,
    expression: Expression,
    update: Document,
}

impl Update {
    pub(crate) fn new(collection: Collection, expression: Expression, update: Document) -> Self {
        Update {
            collection,
            expression,
            update,
        }
    }

    /// Narrows the update: documents must also match `spec`.
    pub fn and(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.and(spec.parse());
        self
    }

    /// Widens the update: documents matching `spec` are also updated.
    pub fn or(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.or(spec.parse());
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Applies the update and returns the number of documents changed.
    pub fn execute(&self) -> CellaResult<usize> {
        self.collection.update_matching(&self.expression, &self.update)
    }
}
