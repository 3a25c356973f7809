#![forbid(unsafe_code)]

//! The state engine: commit points, undo/redo, restore-on-create,
//! and autosave guarding.
//!
//! A user gesture spans press to release. The engine snapshots the
//! whole tree at gesture start; committing at gesture end pushes that
//! pre-action document onto the undo stack, so undoing lands exactly
//! on the state before the gesture began. One commit per discrete
//! gesture (drag-release or click-commit) is the single rule applied
//! to every widget kind.

use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, warn};
use twk_tree::{NodeId, NodeTree};
use web_time::{Duration, Instant};

use crate::document::{self, DocState, Document};
use crate::history::UndoHistory;
use crate::store::{PersistError, SaveStore};

/// If no frame advanced within this window, the process is presumed
/// wedged and autosave is suppressed rather than persisting a
/// mid-crash state.
const STUCK_FRAME_LIMIT: Duration = Duration::from_millis(1000);

/// Stem used for automatic saves.
const AUTOSAVE_NAME: &str = "auto";

/// Owns undo/redo history, the pending restore map, and the autosave
/// heuristic for one node tree.
#[derive(Debug)]
pub struct StateEngine {
    history: UndoHistory,
    /// Snapshot taken at the start of the gesture in progress.
    gesture: Option<Arc<Document>>,
    /// Saved state by path, from the most recent restore. Consulted
    /// when nodes are created after a load (restore-on-create).
    pending: AHashMap<String, DocState>,
    last_frame: Instant,
}

impl Default for StateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEngine {
    /// Create an engine with empty history and no pending restores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: UndoHistory::default(),
            gesture: None,
            pending: AHashMap::new(),
            last_frame: Instant::now(),
        }
    }

    /// Mark that a frame advanced; feeds the stuck-frame heuristic.
    pub fn note_frame(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Whether the frame loop looks wedged (no frame within the
    /// limit).
    #[must_use]
    pub fn looks_stuck(&self) -> bool {
        self.last_frame.elapsed() > STUCK_FRAME_LIMIT
    }

    /// Whether undo is currently available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is currently available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo stack depth, for host UI.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Capture the pre-action snapshot for a gesture that may commit.
    ///
    /// Called on press over a widget row, before any value changes.
    /// A gesture that ends without a change simply leaves this
    /// snapshot to be replaced by the next press.
    pub fn begin_gesture(&mut self, tree: &NodeTree) {
        self.gesture = Some(Arc::new(document::snapshot(tree)));
    }

    /// Commit a completed user gesture.
    ///
    /// Pushes the gesture's pre-action document onto the undo stack
    /// and clears redo (history branches). Without a recorded gesture
    /// start the current state is pushed instead, making the commit a
    /// harmless no-op under undo.
    pub fn commit(&mut self, tree: &NodeTree) {
        let pre = self
            .gesture
            .take()
            .unwrap_or_else(|| Arc::new(document::snapshot(tree)));
        self.history.push_undo(pre);
        self.history.clear_redo();
        debug!(depth = self.history.undo_depth(), "undo point committed");
    }

    /// Undo one commit. Returns whether anything changed.
    pub fn undo(&mut self, tree: &mut NodeTree) -> bool {
        let Some(doc) = self.history.pop_undo() else {
            return false;
        };
        self.history.push_redo(Arc::new(document::snapshot(tree)));
        document::restore(&doc, tree, &mut self.pending);
        self.gesture = None;
        true
    }

    /// Redo one undone commit. Returns whether anything changed.
    pub fn redo(&mut self, tree: &mut NodeTree) -> bool {
        let Some(doc) = self.history.pop_redo() else {
            return false;
        };
        self.history.push_undo(Arc::new(document::snapshot(tree)));
        document::restore(&doc, tree, &mut self.pending);
        self.gesture = None;
        true
    }

    /// Restore a loaded document into the tree and remember every
    /// entry for restore-on-create. Loads are not undoable gestures.
    pub fn restore_document(&mut self, doc: &Document, tree: &mut NodeTree) {
        document::restore(doc, tree, &mut self.pending);
        self.gesture = None;
    }

    /// Overwrite a freshly created node from the pending map, if the
    /// most recently loaded document mentioned its path.
    pub fn overwrite_from_pending(&self, tree: &mut NodeTree, id: NodeId) {
        let path = tree.node(id).path.clone();
        if let Some(state) = self.pending.get(&path) {
            document::apply_state(tree, id, state);
        }
    }

    /// Current document (fresh snapshot of the tree).
    #[must_use]
    pub fn current_document(&self, tree: &NodeTree) -> Document {
        document::snapshot(tree)
    }

    /// Write the autosave unless the stuck-frame heuristic trips.
    ///
    /// Returns whether a save was written. Intended to be called from
    /// the host's graceful-shutdown hook, after the frame loop has
    /// definitively stopped.
    pub fn create_autosave(
        &self,
        tree: &NodeTree,
        store: &SaveStore,
    ) -> Result<bool, PersistError> {
        if self.looks_stuck() {
            warn!(
                "skipping autosave: no frame advanced within {:?}, refusing to persist a possibly corrupted state",
                STUCK_FRAME_LIMIT
            );
            return Ok(false);
        }
        store.save(AUTOSAVE_NAME, &document::snapshot(tree), &tree.pretty_print())?;
        Ok(true)
    }
}
