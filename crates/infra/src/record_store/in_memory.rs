use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use recordkeep_core::{Record, RecordId};

use super::r#trait::{RecordStore, StoreError, StoreResult};

/// In-memory record store for tests/dev.
///
/// Ids start at 1 and are never reused, including after a delete, which is
/// what a `BIGSERIAL` column does as well.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    inner: RwLock<Table<R>>,
}

#[derive(Debug)]
struct Table<R> {
    rows: BTreeMap<RecordId, R>,
    last_id: i64,
}

impl<R> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn list(&self) -> StoreResult<Vec<R>> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<R>> {
        let table = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: R::Draft) -> StoreResult<R> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        table.last_id += 1;
        let id = RecordId::new(table.last_id);
        let record = R::from_draft(id, draft, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: RecordId, patch: R::Patch) -> StoreResult<Option<R>> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.get_mut(&id).map(|row| {
            row.apply(patch);
            row.clone()
        }))
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let mut table = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.remove(&id).is_some())
    }
}
