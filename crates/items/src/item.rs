use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recordkeep_core::{DomainResult, Record, RecordId, required_text, supplied_text};

/// Record: Item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub name: String,
}

/// Validated creation input for an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
}

impl NewItem {
    /// Fails with `"Name is required"` when `name` is missing or empty.
    pub fn new(name: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            name: required_text(name, "Name")?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Partial update for an [`Item`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    name: Option<String>,
}

impl ItemPatch {
    /// Empty strings are treated like absent fields.
    pub fn new(name: Option<String>) -> Self {
        Self {
            name: supplied_text(name),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Record for Item {
    type Draft = NewItem;
    type Patch = ItemPatch;

    const ENTITY: &'static str = "Item";

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: NewItem, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }

    fn apply(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}
