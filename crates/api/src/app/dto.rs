//! Request DTOs.
//!
//! Every field is optional at the wire level so that a missing required field
//! produces the domain's `"<Field> is required"` message rather than a
//! deserialization error. Unknown fields are ignored.

use serde::Deserialize;

use recordkeep_core::DomainResult;
use recordkeep_items::{ItemPatch, NewItem};
use recordkeep_todos::{NewTodo, TodoPatch, parse_completed};

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
}

impl CreateItemRequest {
    pub fn into_draft(self) -> DomainResult<NewItem> {
        NewItem::new(self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
}

impl UpdateItemRequest {
    pub fn into_patch(self) -> ItemPatch {
        ItemPatch::new(self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub description: Option<String>,
}

impl CreateTodoRequest {
    pub fn into_draft(self) -> DomainResult<NewTodo> {
        NewTodo::new(self.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub description: Option<String>,
}

impl UpdateTodoRequest {
    pub fn into_patch(self) -> TodoPatch {
        TodoPatch::with_description(self.description)
    }
}

/// Query string of `PUT /api/todos/check/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct TodoStatusQuery {
    pub completed: Option<String>,
}

impl TodoStatusQuery {
    /// `None` means "flip the current value". A present but empty value is
    /// not a boolean and fails like any other.
    pub fn requested(&self) -> DomainResult<Option<bool>> {
        self.completed.as_deref().map(parse_completed).transpose()
    }
}
