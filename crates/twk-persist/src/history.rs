#![forbid(unsafe_code)]

//! Bounded dual-stack undo/redo history.
//!
//! Snapshots are whole [`Document`]s shared by `Arc`: pushing clones
//! the pointer, not the document, and a snapshot popped onto the
//! other stack is never re-serialized. The undo stack is bounded;
//! oldest entries are evicted first.
//!
//! ```text
//! commit x3
//! ┌──────────────────────────────────────┐
//! │ Undo: [d0, d1, d2]   Redo: []        │
//! └──────────────────────────────────────┘
//! undo() x2
//! ┌──────────────────────────────────────┐
//! │ Undo: [d0]           Redo: [d3, d2]  │
//! └──────────────────────────────────────┘
//! commit (new branch, redo cleared)
//! ┌──────────────────────────────────────┐
//! │ Undo: [d0, d4]       Redo: []        │
//! └──────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::document::Document;
use crate::UNDO_STACK_LIMIT;

/// Dual stacks of immutable whole-tree snapshots.
#[derive(Debug)]
pub struct UndoHistory {
    /// Newest at the back; evicted from the front.
    undo: VecDeque<Arc<Document>>,
    redo: Vec<Arc<Document>>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(UNDO_STACK_LIMIT)
    }
}

impl UndoHistory {
    /// Create a history bounded to `limit` undo snapshots.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push an undo snapshot, evicting the oldest past the limit.
    ///
    /// Does not touch the redo stack; clearing it on new commits is
    /// the engine's call.
    pub fn push_undo(&mut self, doc: Arc<Document>) {
        self.undo.push_back(doc);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Pop the most recent undo snapshot.
    pub fn pop_undo(&mut self) -> Option<Arc<Document>> {
        self.undo.pop_back()
    }

    /// Push a redo snapshot.
    pub fn push_redo(&mut self, doc: Arc<Document>) {
        self.redo.push(doc);
    }

    /// Pop the most recent redo snapshot.
    pub fn pop_redo(&mut self) -> Option<Arc<Document>> {
        self.redo.pop()
    }

    /// Drop all redo snapshots (a new commit branches history).
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::snapshot;
    use proptest::prelude::*;
    use twk_tree::NodeTree;

    fn doc() -> Arc<Document> {
        Arc::new(snapshot(&NodeTree::new()))
    }

    #[test]
    fn starts_empty() {
        let h = UndoHistory::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn push_pop_is_lifo() {
        let mut h = UndoHistory::new(10);
        let a = doc();
        let b = doc();
        h.push_undo(a.clone());
        h.push_undo(b.clone());
        assert!(Arc::ptr_eq(&h.pop_undo().unwrap(), &b));
        assert!(Arc::ptr_eq(&h.pop_undo().unwrap(), &a));
        assert!(h.pop_undo().is_none());
    }

    #[test]
    fn limit_evicts_oldest_first() {
        let mut h = UndoHistory::new(3);
        let first = doc();
        h.push_undo(first.clone());
        for _ in 0..3 {
            h.push_undo(doc());
        }
        assert_eq!(h.undo_depth(), 3);
        // Drain: `first` must be gone.
        let mut remaining = Vec::new();
        while let Some(d) = h.pop_undo() {
            remaining.push(d);
        }
        assert!(remaining.iter().all(|d| !Arc::ptr_eq(d, &first)));
    }

    #[test]
    fn clear_redo_drops_everything() {
        let mut h = UndoHistory::new(10);
        h.push_redo(doc());
        h.push_redo(doc());
        assert_eq!(h.redo_depth(), 2);
        h.clear_redo();
        assert!(!h.can_redo());
    }

    proptest! {
        // The undo stack never exceeds its bound.
        #[test]
        fn prop_depth_never_exceeds_limit(pushes in 1usize..50, limit in 1usize..10) {
            let mut h = UndoHistory::new(limit);
            for _ in 0..pushes {
                h.push_undo(doc());
                prop_assert!(h.undo_depth() <= limit);
            }
        }
    }
}
