//! Single-table record storage boundary.
//!
//! `RecordStore<R>` is generic over the entity; each backend supplies the
//! storage mechanics once and every entity reuses them. The Postgres backend
//! additionally needs the entity's table description (`PgSchema`).

pub mod in_memory;
pub mod postgres;
pub mod schema;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use r#trait::{RecordStore, StoreError, StoreResult};
pub use schema::PgSchema;
