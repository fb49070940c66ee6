use crate::collection::{Document, IdGenerator, Index};
use crate::errors::{CellaError, CellaResult, ErrorKind};
use crate::filter::{Expression, IntoExpression, QuerySpec};
use crate::query::{Delete, Query, Update};
use crate::store::CommitHandle;
use crate::{DOC_COLLECTION, DOC_ID};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// A named set of documents keyed by their [`Index`].
///
/// `Collection` is a cheap handle: clones share the same documents, and the
/// store hands out the same instance for the same name. Documents keep
/// their insertion order.
///
/// Every mutating operation signals the owning store after the in-memory
/// change, and returns once the store has attempted to persist. A
/// persistence failure is returned to the caller; the in-memory change is
/// kept.
///
/// # Examples
///
/// ```rust
/// use cella::doc;
/// use cella::filter::{gt, QuerySpec};
/// use cella::store::Store;
///
/// let store = Store::in_memory();
/// let people = store.collection("people").unwrap();
///
/// people.insert_with_id(doc! { "name": "Ann", "age": 31 }, 1).unwrap();
/// people.insert_with_id(doc! { "name": "Bob", "age": 9 }, 2).unwrap();
///
/// let adults = people.query(QuerySpec::new().field("age", gt(17)));
/// assert_eq!(adults.len(), 1);
/// assert_eq!(people.get(2).unwrap().get("name").unwrap(), "Bob");
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    documents: RwLock<IndexMap<Index, Document>>,
    commit: CommitHandle,
    id_generator: IdGenerator,
}

impl Collection {
    pub(crate) fn new(name: &str, commit: CommitHandle, id_generator: IdGenerator) -> Self {
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                documents: RwLock::new(IndexMap::new()),
                commit,
                id_generator,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Inserts a document and returns its id.
    ///
    /// The id is taken from the document's `_id` field when present,
    /// otherwise it is generated.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InsertionError`] if the id is not an integer or a
    ///   non-empty string, if it is already used in this collection, or if
    ///   the document carries the reserved `_collection` field.
    /// * [`ErrorKind::PersistenceError`] if the store could not be written
    ///   afterwards. The document stays inserted.
    pub fn insert(&self, document: Document) -> CellaResult<Index> {
        self.insert_one(document, None)
    }

    /// Inserts a document under an explicit id, ignoring any `_id` it carries.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to insert
    /// * `id` - The id to store it under
    ///
    /// # Returns
    ///
    /// The id the document was stored under
    pub fn insert_with_id<I: Into<Index>>(&self, document: Document, id: I) -> CellaResult<Index> {
        self.insert_one(document, Some(id.into()))
    }

    /// Inserts several documents with a single commit.
    ///
    /// Ids are resolved and validated for the whole batch first, duplicates
    /// inside the batch included. If any of them is rejected nothing is
    /// inserted.
    pub fn insert_many(&self, documents: Vec<Document>) -> CellaResult<Vec<Index>> {
        let mut batch_ids = HashSet::with_capacity(documents.len());
        let mut resolved = Vec::with_capacity(documents.len());
        for document in documents {
            let id = self.resolve_id(&document, None)?;
            if !batch_ids.insert(id.clone()) {
                return Err(self.duplicate_id(&id));
            }
            resolved.push((id, document));
        }

        let resolved = {
            let mut guard = self.inner.documents.write();
            if let Some((id, _)) = resolved.iter().find(|(id, _)| guard.contains_key(id)) {
                return Err(self.duplicate_id(id));
            }

            let mut ids = Vec::with_capacity(resolved.len());
            for (id, document) in resolved {
                guard.insert(id.clone(), document.with_id(&id));
                ids.push(id);
            }
            ids
        };

        log::debug!("Inserted {} documents into {}", resolved.len(), self.inner.name);
        self.inner.commit.commit()?;
        Ok(resolved)
    }

    /// Returns a copy of the document stored under `id`.
    pub fn get<I: Into<Index>>(&self, id: I) -> Option<Document> {
        self.inner.documents.read().get(&id.into()).cloned()
    }

    pub fn contains<I: Into<Index>>(&self, id: I) -> bool {
        self.inner.documents.read().contains_key(&id.into())
    }

    /// Returns every document matching the predicate, in insertion order.
    ///
    /// Accepts either a parsed [`Expression`] or a [`QuerySpec`].
    pub fn query<E: IntoExpression>(&self, predicate: E) -> Vec<Document> {
        let expression = predicate.into_expression();
        self.inner
            .documents
            .read()
            .values()
            .filter(|document| expression.matches(document))
            .cloned()
            .collect()
    }

    /// Snapshot of every document in insertion order.
    pub fn all(&self) -> Vec<Document> {
        self.inner.documents.read().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.documents.read().is_empty()
    }

    /// Removes every document matching the predicate and commits once.
    ///
    /// # Returns
    ///
    /// The number of documents removed
    pub fn delete_matching<E: IntoExpression>(&self, predicate: E) -> CellaResult<usize> {
        let expression = predicate.into_expression();
        let removed = {
            let mut guard = self.inner.documents.write();
            let ids = matching_ids(&guard, &expression);
            for id in ids.iter() {
                guard.shift_remove(id);
            }
            ids.len()
        };

        log::debug!("Deleted {} documents from {} where {}", removed, self.inner.name, expression);
        self.inner.commit.commit()?;
        Ok(removed)
    }

    /// Shallow-merges `update` into every matching document and commits once.
    ///
    /// Only the top-level fields present in `update` are overwritten. The
    /// identity fields `_id` and `_collection` are never changed.
    ///
    /// # Returns
    ///
    /// The number of documents updated
    pub fn update_matching<E: IntoExpression>(&self, predicate: E, update: &Document) -> CellaResult<usize> {
        let expression = predicate.into_expression();
        let updated = {
            let mut guard = self.inner.documents.write();
            let ids = matching_ids(&guard, &expression);
            let mut skipped = Vec::new();
            for id in ids.iter() {
                if let Some(document) = guard.get_mut(id) {
                    skipped = document.merge(update);
                }
            }
            if !skipped.is_empty() {
                log::warn!(
                    "Ignored reserved fields {:?} in update payload for {}",
                    skipped,
                    self.inner.name
                );
            }
            ids.len()
        };

        log::debug!("Updated {} documents in {} where {}", updated, self.inner.name, expression);
        self.inner.commit.commit()?;
        Ok(updated)
    }

    /// Starts a deferred query for the documents matching `spec`.
    pub fn find(&self, spec: QuerySpec) -> Query {
        Query::new(self.clone(), spec.parse())
    }

    /// Starts a deferred partial update of the documents matching `spec`.
    pub fn update(&self, spec: QuerySpec, update: Document) -> Update {
        Update::new(self.clone(), spec.parse(), update)
    }

    /// Starts a deferred removal of the documents matching `spec`.
    pub fn delete(&self, spec: QuerySpec) -> Delete {
        Delete::new(self.clone(), spec.parse())
    }

    /// Inserts a loaded document without committing.
    pub(crate) fn load(&self, id: Index, document: Document) -> CellaResult<()> {
        let mut guard = self.inner.documents.write();
        if guard.contains_key(&id) {
            return Err(self.duplicate_id(&id));
        }
        guard.insert(id.clone(), document.with_id(&id));
        Ok(())
    }

    /// Visits every document in insertion order under one read lock.
    pub(crate) fn for_each<F: FnMut(&Document)>(&self, mut visit: F) {
        for document in self.inner.documents.read().values() {
            visit(document);
        }
    }

    fn insert_one(&self, document: Document, explicit: Option<Index>) -> CellaResult<Index> {
        let id = self.resolve_id(&document, explicit)?;
        {
            let mut guard = self.inner.documents.write();
            if guard.contains_key(&id) {
                return Err(self.duplicate_id(&id));
            }
            guard.insert(id.clone(), document.with_id(&id));
        }

        log::debug!("Inserted document {} into {}", id, self.inner.name);
        self.inner.commit.commit()?;
        Ok(id)
    }

    fn resolve_id(&self, document: &Document, explicit: Option<Index>) -> CellaResult<Index> {
        if document.contains_key(DOC_COLLECTION) {
            log::error!("Document inserted into {} carries reserved field {}", self.inner.name, DOC_COLLECTION);
            return Err(CellaError::new(
                &format!("A document must not carry the reserved field '{}'", DOC_COLLECTION),
                ErrorKind::InsertionError,
            ));
        }

        let id = match explicit {
            Some(id) => id,
            None => match document.get(DOC_ID) {
                Some(value) => Index::try_from(value)?,
                None => self.inner.id_generator.next_id(),
            },
        };

        if id.is_empty() {
            log::error!("Empty id rejected by collection {}", self.inner.name);
            return Err(CellaError::new(
                "The id of an item must not be an empty string",
                ErrorKind::InsertionError,
            ));
        }
        Ok(id)
    }

    fn duplicate_id(&self, id: &Index) -> CellaError {
        log::error!("Duplicate id {} in collection {}", id, self.inner.name);
        CellaError::new(
            &format!("An item with id {} already exists in collection '{}'", id, self.inner.name),
            ErrorKind::InsertionError,
        )
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("count", &self.count())
            .finish()
    }
}

fn matching_ids(documents: &IndexMap<Index, Document>, expression: &Expression) -> Vec<Index> {
    documents
        .iter()
        .filter(|(_, document)| expression.matches(document))
        .map(|(id, _)| id.clone())
        .collect()
}
