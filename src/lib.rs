//! # Kanban Core
//!
//! Board state controller for Kanban views of epics and tasks.
//!
//! This crate keeps the ordered items of a board across its columns,
//! enforces per-column work-in-progress limits, and applies moves and
//! reorders optimistically while a caller-supplied [`Persistence`]
//! collaborator stores them, rolling back when it fails. It has no
//! dependency on any UI layer or on a specific storage backend.

pub mod controller;
pub mod domain;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use controller::{KanbanController, Outcome};
pub use domain::{
    board::{BoardConfig, Column, ColumnId},
    item::{Fields, Item, ItemId},
};
pub use error::{KanbanError, Result};
pub use storage::Persistence;

#[cfg(feature = "file-storage")]
pub use storage::file_storage::{FileStorage, Placement};
