//! Postgres-backed record store.
//!
//! One generic implementation serves every entity; the SQL comes from the
//! entity's [`PgSchema`].
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `PoolClosed`, `PoolTimedOut`, `Io`, `Tls` | `Unavailable` |
//! | `ColumnNotFound`, `ColumnDecode`, `Decode` | `InvalidRow` |
//! | `Database` and anything else | `Database` |

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use recordkeep_core::RecordId;

use super::r#trait::{RecordStore, StoreError, StoreResult};
use super::schema::PgSchema;

/// Postgres-backed store for one entity table.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool which is thread-safe (Arc + Send + Sync).
/// Each operation is a single statement, i.e. a single implicit transaction.
pub struct PostgresRecordStore<R> {
    pool: Arc<PgPool>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for PostgresRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: PgSchema> PostgresRecordStore<R> {
    /// Create a store on top of an existing pool.
    ///
    /// The pool is shared; closing it affects every store built from it.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            _record: PhantomData,
        }
    }

    /// Create the entity table if it does not exist yet.
    #[instrument(skip(self), fields(table = R::TABLE), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(R::CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl<R: PgSchema> RecordStore<R> for PostgresRecordStore<R> {
    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn list(&self) -> StoreResult<Vec<R>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id ASC", R::COLUMNS, R::TABLE);
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter()
            .map(|row| R::from_row(row).map_err(|e| map_sqlx_error("list", e)))
            .collect()
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn get(&self, id: RecordId) -> StoreResult<Option<R>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", R::COLUMNS, R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref()
            .map(R::from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("get", e))
    }

    #[instrument(skip(self, draft), fields(table = R::TABLE), err)]
    async fn insert(&self, draft: R::Draft) -> StoreResult<R> {
        let row = R::bind_draft(sqlx::query(R::INSERT), &draft)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        R::from_row(&row).map_err(|e| map_sqlx_error("insert", e))
    }

    #[instrument(skip(self, patch), fields(table = R::TABLE), err)]
    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<Option<R>> {
        let row = R::bind_patch(sqlx::query(R::UPDATE), id, &patch)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        row.as_ref()
            .map(R::from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("update", e))
    }

    #[instrument(skip(self), fields(table = R::TABLE), err)]
    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql)
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        err @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)) => {
            StoreError::InvalidRow(format!("{} in {}", err, operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    //! These run against a real database and are skipped unless
    //! `TEST_DATABASE_URL` is set. Tables are dropped and recreated.

    use super::*;
    use recordkeep_items::{Item, ItemPatch, NewItem};
    use recordkeep_todos::{NewTodo, Todo, TodoPatch};

    async fn pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.expect("failed to connect to TEST_DATABASE_URL");
        sqlx::query("DROP TABLE IF EXISTS items, todos")
            .execute(&pool)
            .await
            .expect("failed to reset tables");
        Some(pool)
    }

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            map_sqlx_error("get", sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("get", sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn missing_column_maps_to_invalid_row() {
        let err = map_sqlx_error("list", sqlx::Error::ColumnNotFound("name".into()));
        assert!(matches!(err, StoreError::InvalidRow(_)));
    }

    #[tokio::test]
    async fn item_crud_roundtrip() {
        let Some(pool) = pool().await else { return };
        let store = PostgresRecordStore::<Item>::new(pool);
        store.ensure_schema().await.unwrap();

        let item = store
            .insert(NewItem::new(Some("Widget".into())).unwrap())
            .await
            .unwrap();
        assert_eq!(store.get(item.id).await.unwrap(), Some(item.clone()));

        let renamed = store
            .update(item.id, ItemPatch::new(Some("Gadget".into())))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Gadget");
        let unchanged = store.update(item.id, ItemPatch::default()).await.unwrap();
        assert_eq!(unchanged, Some(renamed.clone()));
        assert_eq!(store.list().await.unwrap(), vec![renamed]);

        assert!(store.delete(item.id).await.unwrap());
        assert!(!store.delete(item.id).await.unwrap());
        assert!(store.update(item.id, ItemPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn todo_defaults_come_from_the_table() {
        let Some(pool) = pool().await else { return };
        let store = PostgresRecordStore::<Todo>::new(pool);
        store.ensure_schema().await.unwrap();

        let todo = store
            .insert(NewTodo::new(Some("buy milk".into())).unwrap())
            .await
            .unwrap();
        assert!(!todo.completed);

        store.update(todo.id, TodoPatch::with_status(None)).await.unwrap();
        let stored = store.get(todo.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.created_at, todo.created_at);

        let set = store
            .update(todo.id, TodoPatch::with_status(Some(true)))
            .await
            .unwrap()
            .unwrap();
        assert!(set.completed);
    }

    #[tokio::test]
    async fn interleaved_toggle_and_rename_both_survive() {
        let Some(pool) = pool().await else { return };
        let store = PostgresRecordStore::<Todo>::new(pool);
        store.ensure_schema().await.unwrap();

        let todo = store
            .insert(NewTodo::new(Some("buy milk".into())).unwrap())
            .await
            .unwrap();

        // Both patches are built from the same incomplete snapshot.
        let toggle = TodoPatch::with_status(None);
        let rename = TodoPatch::with_description(Some("buy bread".into()));
        store.update(todo.id, toggle).await.unwrap().unwrap();
        store.update(todo.id, rename).await.unwrap().unwrap();

        let stored = store.get(todo.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.description, "buy bread");
    }
}
