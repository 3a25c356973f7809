#![forbid(unsafe_code)]

//! The node tree and its reconciliation protocol.
//!
//! [`NodeTree`] owns every node in an arena and indexes them by path.
//! Immediate-mode accessor calls reconcile against the retained tree
//! through [`find_or_create`](NodeTree::find_or_create): the first
//! call's construction arguments win for the node's lifetime; later
//! calls only ever change values.
//!
//! # Invariants
//!
//! 1. Paths are unique; the index and the arena never disagree.
//! 2. The root folder has the empty path and lives at slot 0.
//! 3. Nodes are never removed; the tree only grows.
//! 4. A folder's children hold no two entries with the same name
//!    (guaranteed by path uniqueness).

use ahash::AHashMap;
use thiserror::Error;
use tracing::warn;

use crate::node::{FolderState, Node, NodeId, NodeKind};
use crate::path;

/// Errors reported by tree reconciliation.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A path was requested whose ancestor already exists as a value
    /// node. This is a host configuration error; the tree is left
    /// untouched rather than coerced.
    #[error("path {path:?} conflicts with value node at {ancestor:?}")]
    PathConflict {
        /// The requested path.
        path: String,
        /// The ancestor that is not a folder.
        ancestor: String,
    },

    /// An accessor expected one widget kind but the retained node at
    /// that path was declared as another.
    #[error("node {path:?} is a {found}, expected {expected}")]
    KindMismatch {
        /// The requested path.
        path: String,
        /// Kind the accessor expected.
        expected: &'static str,
        /// Kind the retained node actually has.
        found: &'static str,
    },
}

/// Arena-owned tree of nodes, indexed by absolute path.
#[derive(Debug)]
pub struct NodeTree {
    nodes: Vec<Node>,
    index: AHashMap<String, NodeId>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree containing only the root folder (empty path).
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            index: AHashMap::new(),
        };
        let root = Node::new("", None, NodeKind::Folder(FolderState::default()));
        tree.nodes.push(root);
        tree.index.insert(String::new(), NodeId(0));
        tree
    }

    /// The root folder's id.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Borrow a node by id.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node by id.
    #[inline]
    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Exact path lookup.
    #[must_use]
    pub fn find(&self, p: &str) -> Option<NodeId> {
        self.index.get(p).copied()
    }

    /// Find a node or create it (and any missing ancestor folders).
    ///
    /// This is the reconciliation rule: if the path already exists the
    /// retained node is returned as-is and `make` is never invoked;
    /// the first call's construction arguments win for the node's
    /// lifetime. Missing ancestors are created as plain folders; the
    /// new leaf is appended to its parent's children in the order
    /// first requested.
    pub fn find_or_create(
        &mut self,
        p: &str,
        make: impl FnOnce() -> NodeKind,
    ) -> Result<NodeId, TreeError> {
        if let Some(id) = self.find(p) {
            return Ok(id);
        }
        let parent_path = path::parent(p).unwrap_or("");
        let parent = self.ensure_folder(parent_path)?;
        Ok(self.insert(p, parent, make()))
    }

    /// Find or create a folder at `p`, creating missing ancestors.
    ///
    /// Fails with [`TreeError::PathConflict`] if `p` or any ancestor
    /// already exists as a value node.
    pub fn ensure_folder(&mut self, p: &str) -> Result<NodeId, TreeError> {
        if p.is_empty() {
            return Ok(self.root());
        }
        let mut parent = self.root();
        let mut running = String::new();
        for segment in path::segments(p) {
            running = path::join(&running, segment);
            match self.find(&running) {
                Some(id) if self.node(id).kind.is_folder() => parent = id,
                Some(_) => {
                    warn!(path = p, ancestor = %running, "expected folder on path but found value node");
                    return Err(TreeError::PathConflict {
                        path: p.to_string(),
                        ancestor: running,
                    });
                }
                None => {
                    parent = self.insert(
                        &running,
                        parent,
                        NodeKind::Folder(FolderState::default()),
                    );
                }
            }
        }
        Ok(parent)
    }

    fn insert(&mut self, p: &str, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(p, Some(parent), kind));
        self.index.insert(p.to_string(), id);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Ordered children of a folder (empty for value nodes).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Iterate all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Clear the transient hover flag on every node except `keep`.
    ///
    /// Exactly one node may show as hovered per frame.
    pub fn clear_hover_except(&mut self, keep: Option<NodeId>) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if Some(NodeId(i as u32)) != keep {
                node.hovered = false;
            }
        }
    }

    /// Human-readable tree rendering, used for the `.txt` preview
    /// written next to each save file.
    #[must_use]
    pub fn pretty_print(&self) -> String {
        let mut out = String::from("root\n");
        self.pretty_children(self.root(), "", &mut out);
        out
    }

    fn pretty_children(&self, id: NodeId, prefix: &str, out: &mut String) {
        let children = self.node(id).children.clone();
        let last = children.len().saturating_sub(1);
        for (i, child) in children.iter().enumerate() {
            let node = self.node(*child);
            let guide = if i == last { "└── " } else { "├── " };
            out.push_str(prefix);
            out.push_str(guide);
            out.push_str(&node.name);
            out.push('\n');
            if node.kind.is_folder() {
                let next = if i == last { "    " } else { "│   " };
                self.pretty_children(*child, &format!("{prefix}{next}"), out);
            }
        }
    }
}
