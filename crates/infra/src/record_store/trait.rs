use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use recordkeep_core::{Record, RecordId};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure. None of these are the client's fault; the API maps them
/// all to a 500 response.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached (pool closed, I/O failure, timeout).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The database rejected a statement.
    #[error("database error: {0}")]
    Database(String),

    /// A row could not be mapped back into a record.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// An in-memory store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Storage for one entity table.
///
/// Every method is a single round trip and a single commit; there is no
/// transaction spanning calls. Updates are applied against the stored row
/// inside that one write, so concurrent patches to different fields of the
/// same record both survive.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// All records in insertion order (ascending id).
    async fn list(&self) -> StoreResult<Vec<R>>;

    async fn get(&self, id: RecordId) -> StoreResult<Option<R>>;

    /// Persist a new record. The store assigns the id and any other
    /// server-side fields (e.g. creation timestamp).
    async fn insert(&self, draft: R::Draft) -> StoreResult<R>;

    /// Apply `patch` to the stored record and return the result.
    ///
    /// Returns `None` if no record had this id.
    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<Option<R>>;

    /// Returns `false` if no record had this id.
    async fn delete(&self, id: RecordId) -> StoreResult<bool>;
}

#[async_trait]
impl<R, S> RecordStore<R> for Arc<S>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<R>> {
        (**self).list().await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<R>> {
        (**self).get(id).await
    }

    async fn insert(&self, draft: R::Draft) -> StoreResult<R> {
        (**self).insert(draft).await
    }

    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<Option<R>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
