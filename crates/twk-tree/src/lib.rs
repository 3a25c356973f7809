#![forbid(unsafe_code)]

//! Path-addressed node tree for the TWK overlay.
//!
//! The tree is the shared data structure the window manager, input
//! dispatch, and persistence engine all operate on. Hosts address
//! widgets by slash-delimited absolute paths; the tree reconciles
//! those immediate-mode requests against retained [`Node`]s.
//!
//! # Ownership
//!
//! Nodes live in an arena owned by [`NodeTree`]; parents reference
//! children and children reference parents by [`NodeId`] index, so the
//! parent/child structure is never an ownership cycle.

pub mod node;
pub mod path;
pub mod tree;

pub use node::{
    ColorState, FolderState, Node, NodeId, NodeKind, RadioState, SliderState, TextState,
    ToggleState, Vector2State, WindowPlacement, PRECISION_LADDER,
};
pub use tree::{NodeTree, TreeError};
