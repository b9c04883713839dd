use std::sync::Arc;

use recordkeep_infra::{
    Config, InMemoryRecordStore, RecordStore,
    db::{self, PostgresStores},
};
use recordkeep_items::Item;
use recordkeep_todos::Todo;

/// Store handles shared by every request.
///
/// Built once at startup and torn down when the process exits.
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<dyn RecordStore<Item>>,
    pub todos: Arc<dyn RecordStore<Todo>>,
}

impl AppServices {
    pub fn new(items: Arc<dyn RecordStore<Item>>, todos: Arc<dyn RecordStore<Todo>>) -> Self {
        Self { items, todos }
    }

    /// In-memory stores (dev/test); contents are lost on exit.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::<Item>::new()),
            Arc::new(InMemoryRecordStore::<Todo>::new()),
        )
    }

    /// Postgres stores on one shared pool; creates missing tables.
    pub async fn persistent(config: &Config) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        let stores = PostgresStores::new(pool);
        stores.ensure_schema().await?;

        Ok(Self::new(Arc::new(stores.items), Arc::new(stores.todos)))
    }
}

pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        tracing::info!(max_connections = config.max_connections, "using postgres stores");
        return AppServices::persistent(config).await;
    }

    tracing::warn!("USE_PERSISTENT_STORES=false; records live in memory only");
    Ok(AppServices::in_memory())
}
