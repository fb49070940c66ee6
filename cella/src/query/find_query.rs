use crate::collection::{Collection, Document};
use crate::filter::{Expression, QuerySpec};
use std::sync::Arc;

type Projection = Arc<dyn Fn(Document) -> Document + Send + Sync>;

/// A deferred read over one collection.
///
/// Holds a predicate and an optional projection. Nothing is read until
/// [`execute`](Query::execute) runs, so a query can be built once and
/// executed repeatedly against the collection's current contents.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::filter::{gt, QuerySpec};
/// use cella::store::Store;
///
/// let store = Store::in_memory();
/// let test = store.collection("test").unwrap();
/// test.insert_with_id(doc! { "age": 10, "sex": "M" }, 1).unwrap();
/// test.insert_with_id(doc! { "age": 24, "sex": "F" }, 2).unwrap();
///
/// let names = test
///     .find(QuerySpec::new().field("age", gt(10)))
///     .or(QuerySpec::new().field("sex", "M"))
///     .project(&["sex"])
///     .execute();
/// assert_eq!(names, vec![doc! { "_id": 1, "sex": "M" }, doc! { "_id": 2, "sex": "F" }]);
/// ```
#[derive(Clone)]
pub struct Query {
    collection: Collection,
    expression: Expression,
    projection: Option<Projection>,
}

impl Query {
    pub(crate) fn new(collection: Collection, expression: Expression) -> Self {
        Query {
            collection,
            expression,
            projection: None,
        }
    }

    /// Narrows the query: documents must also match `spec`.
    pub fn and(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.and(spec.parse());
        self
    }

    /// Widens the query: documents matching `spec` are also selected.
    pub fn or(mut self, spec: QuerySpec) -> Self {
        self.expression = self.expression.or(spec.parse());
        self
    }

    /// Sets a projection applied to every matching document.
    ///
    /// Replaces any previous projection.
    pub fn select<F>(mut self, projection: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.projection = Some(Arc::new(projection));
        self
    }

    /// Keeps only `_id` and the named top-level fields in the results.
    pub fn project(self, field_names: &[&str]) -> Self {
        let field_names: Vec<String> = field_names.iter().map(|name| name.to_string()).collect();
        self.select(move |document| {
            let names: Vec<&str> = field_names.iter().map(String::as_str).collect();
            document.project(&names)
        })
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Runs the query: one scan, matches in insertion order, projected.
    pub fn execute(&self) -> Vec<Document> {
        log::debug!("Executing query on {} where {}", self.collection.name(), self.expression);
        let matches = self.collection.query(&self.expression);
        match &self.projection {
            Some(projection) => matches.into_iter().map(|document| projection(document)).collect(),
            None => matches,
        }
    }
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("collection", &self.collection.name())
            .field("expression", &self.expression.to_string())
            .field("projected", &self.projection.is_some())
            .finish()
    }
}
