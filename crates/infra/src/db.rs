//! Database adapters (connection pool, schema bootstrap).

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use recordkeep_items::Item;
use recordkeep_todos::Todo;

use crate::config::Config;
use crate::record_store::{PostgresRecordStore, StoreError};

/// Open the process-wide connection pool.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Postgres stores for every entity, sharing one pool.
pub struct PostgresStores {
    pub items: PostgresRecordStore<Item>,
    pub todos: PostgresRecordStore<Todo>,
}

impl PostgresStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            items: PostgresRecordStore::new(pool.clone()),
            todos: PostgresRecordStore::new(pool),
        }
    }

    /// Create any missing tables.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.items.ensure_schema().await?;
        self.todos.ensure_schema().await?;
        Ok(())
    }
}
