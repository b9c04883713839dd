//! Todos domain module.
//!
//! A todo is a described task with a completion flag and a server-assigned
//! creation timestamp. This crate holds its field set, validation rules and
//! the completion-status transition (no IO, no HTTP, no storage).

pub mod todo;

pub use todo::{NewTodo, StatusChange, Todo, TodoPatch, parse_completed};
