#![forbid(unsafe_code)]

//! Persistence and undo/redo for the TWK overlay.
//!
//! The node tree serializes to a [`Document`]: a tree-shaped,
//! path-keyed structure holding only the fields each node kind
//! declares as persistent (transient geometry and interaction flags
//! are excluded). Documents are immutable once captured and shared by
//! `Arc` between the undo and redo stacks.
//!
//! [`StateEngine`] ties it together: commit points push the
//! pre-action document, restores feed a pending map so nodes created
//! *after* a load still inherit saved values, and autosave is skipped
//! when the stuck-frame heuristic trips.

pub mod document;
pub mod engine;
pub mod history;
pub mod store;

pub use document::{DocEntry, DocState, Document};
pub use engine::StateEngine;
pub use history::UndoHistory;
pub use store::{PersistError, SaveInfo, SaveStore};

/// Maximum number of undo snapshots retained; oldest evicted first.
pub const UNDO_STACK_LIMIT: usize = 1000;
