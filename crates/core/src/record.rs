//! The `Record` contract shared by every single-table entity.
//!
//! A record is created from a validated *draft*, receives its id (and any other
//! server-assigned fields) from the store, and is afterwards mutated only through
//! a *patch*. Stores are generic over this trait, so each entity only has to
//! describe its own field set.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::id::RecordId;

/// A persisted row of one entity table.
pub trait Record: Clone + Send + Sync + Serialize + 'static {
    /// Validated creation input (required fields already checked).
    type Draft: Clone + Send + Sync + 'static;

    /// Partial update. Absent fields leave the record unchanged.
    type Patch: Send + Sync + 'static;

    /// Display name used in client-facing messages (`"Item"`, `"Todo"`).
    const ENTITY: &'static str;

    fn id(&self) -> RecordId;

    /// Materialize a record from a draft once the store assigned its id.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: Self::Patch);
}

/// Validate a required text field on creation.
///
/// Missing and empty values are both rejected with `"<field> is required"`.
pub fn required_text(value: Option<String>, field: &str) -> DomainResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

/// Normalize an optional text field on update.
///
/// An empty string means "no change", same as an absent field.
pub fn supplied_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_accepts_non_empty() {
        assert_eq!(required_text(Some("milk".into()), "Name").unwrap(), "milk");
    }

    #[test]
    fn required_text_rejects_missing_and_empty() {
        let expected = DomainError::Validation("Name is required".to_string());
        assert_eq!(required_text(None, "Name").unwrap_err(), expected);
        assert_eq!(required_text(Some(String::new()), "Name").unwrap_err(), expected);
    }

    #[test]
    fn supplied_text_skips_empty_strings() {
        assert_eq!(supplied_text(Some(String::new())), None);
        assert_eq!(supplied_text(None), None);
        assert_eq!(supplied_text(Some("x".into())), Some("x".to_string()));
    }
}
