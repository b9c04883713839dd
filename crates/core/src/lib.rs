//! `recordkeep-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! record identifiers, the `Record` contract shared by every persisted entity,
//! and the domain error model.

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use record::{Record, required_text, supplied_text};
