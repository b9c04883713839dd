use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recordkeep_core::{DomainError, DomainResult, Record, RecordId, required_text, supplied_text};

/// Record: Todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: RecordId,
    pub description: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Validated creation input for a [`Todo`]. New todos always start incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    description: String,
}

impl NewTodo {
    /// Fails with `"Description is required"` when missing or empty.
    pub fn new(description: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            description: required_text(description, "Description")?,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// How the status endpoint changes `completed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Set(bool),
    /// Invert whatever value is stored at write time.
    Flip,
}

impl StatusChange {
    /// An explicit value is stored as-is; without one the flag flips.
    pub fn from_request(requested: Option<bool>) -> Self {
        requested.map_or(StatusChange::Flip, StatusChange::Set)
    }

    pub fn resolve(self, current: bool) -> bool {
        match self {
            StatusChange::Set(value) => value,
            StatusChange::Flip => !current,
        }
    }
}

/// Partial update for a [`Todo`].
///
/// Carries only the requested change, never a snapshot of other fields, so
/// concurrent patches touching different fields both survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    description: Option<String>,
    status: Option<StatusChange>,
}

impl TodoPatch {
    /// Description-only patch; an empty string is treated like an absent field.
    pub fn with_description(description: Option<String>) -> Self {
        Self {
            description: supplied_text(description),
            status: None,
        }
    }

    /// Status-only patch for the status endpoint.
    pub fn with_status(requested: Option<bool>) -> Self {
        Self {
            description: None,
            status: Some(StatusChange::from_request(requested)),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> Option<StatusChange> {
        self.status
    }
}

impl Record for Todo {
    type Draft = NewTodo;
    type Patch = TodoPatch;

    const ENTITY: &'static str = "Todo";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description: draft.description,
            completed: false,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: TodoPatch) {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.completed = status.resolve(self.completed);
        }
    }
}

/// Parse the `completed` query parameter of the status endpoint.
///
/// Accepts `true`/`false` (any case) and `1`/`0`.
pub fn parse_completed(raw: &str) -> DomainResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(DomainError::validation("completed must be a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn sample() -> Todo {
        Todo::from_draft(
            RecordId::new(1),
            NewTodo::new(Some("buy milk".into())).unwrap(),
            created_at(),
        )
    }

    #[test]
    fn new_todo_requires_a_description() {
        let expected = DomainError::Validation("Description is required".to_string());
        assert_eq!(NewTodo::new(None).unwrap_err(), expected);
        assert_eq!(NewTodo::new(Some(String::new())).unwrap_err(), expected);
    }

    #[test]
    fn new_todos_start_incomplete_with_server_timestamp() {
        let todo = sample();
        assert!(!todo.completed);
        assert_eq!(todo.created_at, created_at());
    }

    #[test]
    fn serializes_created_at_in_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["description"], "buy milk");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn status_patch_without_value_flips_twice_back() {
        let mut todo = sample();
        todo.apply(TodoPatch::with_status(None));
        assert!(todo.completed);
        todo.apply(TodoPatch::with_status(None));
        assert!(!todo.completed);
    }

    #[test]
    fn status_patch_with_value_sets_it() {
        let mut todo = sample();
        todo.apply(TodoPatch::with_status(Some(false)));
        assert!(!todo.completed);
        todo.apply(TodoPatch::with_status(Some(true)));
        todo.apply(TodoPatch::with_status(Some(true)));
        assert!(todo.completed);
    }

    #[test]
    fn description_patch_skips_empty_and_keeps_completed() {
        let mut todo = sample();
        todo.apply(TodoPatch::with_status(Some(true)));
        todo.apply(TodoPatch::with_description(Some(String::new())));
        assert_eq!(todo.description, "buy milk");
        todo.apply(TodoPatch::with_description(Some("buy oat milk".into())));
        assert_eq!(todo.description, "buy oat milk");
        assert!(todo.completed);
    }

    #[test]
    fn patches_built_from_the_same_snapshot_compose() {
        let mut todo = sample();
        let flip = TodoPatch::with_status(None);
        let rename = TodoPatch::with_description(Some("buy bread".into()));
        assert_eq!(rename.status(), None);
        todo.apply(flip);
        todo.apply(rename);
        assert!(todo.completed);
        assert_eq!(todo.description, "buy bread");
    }

    #[test]
    fn status_change_resolves_against_stored_value() {
        assert_eq!(StatusChange::from_request(None), StatusChange::Flip);
        assert!(StatusChange::Flip.resolve(false));
        assert!(!StatusChange::Set(false).resolve(false));
    }

    #[test]
    fn parse_completed_accepts_booleans_only() {
        assert!(parse_completed("true").unwrap());
        assert!(parse_completed("TRUE").unwrap());
        assert!(parse_completed("1").unwrap());
        assert!(!parse_completed("false").unwrap());
        assert!(!parse_completed("0").unwrap());
        assert_eq!(
            parse_completed("maybe").unwrap_err(),
            DomainError::Validation("completed must be a boolean".to_string())
        );
        assert!(parse_completed("").is_err());
    }

    proptest! {
        /// Property: flipping an even number of times restores the original flag.
        #[test]
        fn even_number_of_flips_is_identity(start in any::<bool>(), pairs in 0usize..8) {
            let mut todo = sample();
            todo.completed = start;
            for _ in 0..pairs * 2 {
                todo.apply(TodoPatch::with_status(None));
            }
            prop_assert_eq!(todo.completed, start);
        }
    }
}
