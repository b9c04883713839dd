//! Infrastructure layer: record storage, database wiring, config.

pub mod config;
pub mod db;
pub mod record_store;

pub use config::{Config, ConfigError};
pub use record_store::{InMemoryRecordStore, PgSchema, PostgresRecordStore, RecordStore, StoreError, StoreResult};
