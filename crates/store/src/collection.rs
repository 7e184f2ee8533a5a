//! Store-facing collection contract.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use trailhead_query::QueryOptions;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("store internal error: {0}")]
    Internal(String),
}

/// A collection of documents of one record type.
///
/// `find` with [`QueryOptions::all`] is the unconstrained "fetch everything"
/// handle the query builder narrows.
pub trait Collection<T>: Send + Sync {
    /// Append a new document. Insertion order is preserved and is the
    /// substrate the stable sort contract rests on.
    fn insert(&self, id: Uuid, record: T) -> Result<(), StoreError>;

    /// Append a new document only if no existing document matches
    /// `conflict`; `Ok(false)` reports the conflict without inserting.
    ///
    /// The check and the append are one atomic operation, the in-process
    /// equivalent of a unique index. Two concurrent inserts with the same
    /// conflicting field cannot both succeed.
    fn insert_unique(
        &self,
        id: Uuid,
        record: T,
        conflict: &dyn Fn(&T) -> bool,
    ) -> Result<bool, StoreError>;

    fn get(&self, id: Uuid) -> Result<Option<T>, StoreError>;

    /// Replace an existing document, bumping its internal version counter.
    fn replace(&self, id: Uuid, record: T) -> Result<(), StoreError>;

    /// Remove a document; `Ok(false)` if it was not present.
    fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Execute a composed query, returning projected documents.
    fn find(&self, options: &QueryOptions) -> Result<Vec<Value>, StoreError>;

    /// Typed scan in store order; internal use (uniqueness checks, lookups
    /// that need hidden fields such as password hashes).
    fn list(&self) -> Result<Vec<T>, StoreError>;

    fn count(&self) -> Result<u64, StoreError>;
}
