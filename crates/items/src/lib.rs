//! Items domain module.
//!
//! An item is a named row in the `items` table. This crate holds its field set
//! and validation rules only (no IO, no HTTP, no storage).

pub mod item;

pub use item::{Item, ItemPatch, NewItem};
