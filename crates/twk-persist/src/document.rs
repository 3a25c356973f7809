#![forbid(unsafe_code)]

//! The persisted document format and tree snapshot/restore.
//!
//! A document mirrors the node tree's shape. Each entry carries
//! `{path, kind, kind-specific persisted fields, children?}`,
//! internally tagged by kind so the compiler checks the field sets
//! per variant. Preview nodes are never written and never matched.
//!
//! Restore walks the document breadth-first: entries whose path
//! matches a live node overwrite that node's persisted fields;
//! every entry (matched or not) also lands in a pending map, so a
//! node declared *after* the restore inherits its saved state the
//! moment it is created.

use std::collections::VecDeque;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;
use twk_core::Vec2;
use twk_tree::{NodeId, NodeKind, NodeTree, WindowPlacement, PRECISION_LADDER};

/// One persisted node entry, keyed by absolute path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    /// The node's absolute path; the sole identity used for matching.
    pub path: String,
    /// Kind tag and persisted fields.
    #[serde(flatten)]
    pub state: DocState,
}

/// Persisted fields per node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocState {
    /// A folder and, when window-bound, its window placement.
    Folder {
        /// Bound window screen x, if a window was ever opened.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen_x: Option<f32>,
        /// Bound window screen y.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screen_y: Option<f32>,
        /// Bound window closed flag.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        closed: Option<bool>,
        /// Persisted children, in display order.
        #[serde(default)]
        children: Vec<DocEntry>,
    },
    /// Float slider value and precision.
    Slider {
        /// Current value.
        value: f32,
        /// Index into the precision ladder.
        precision_index: usize,
        /// The step that index selects; informational, the index wins.
        precision_step: f32,
    },
    /// 2D vector components and shared precision.
    Vector2 {
        /// X component.
        x: f32,
        /// Y component.
        y: f32,
        /// Index into the precision ladder.
        precision_index: usize,
        /// The step that index selects; informational, the index wins.
        precision_step: f32,
    },
    /// Boolean toggle.
    Toggle {
        /// Current value.
        checked: bool,
    },
    /// String picker selection, stored by option text.
    Radio {
        /// Selected option text.
        selected: String,
    },
    /// Color as packed 0xAARRGGBB.
    Color {
        /// Packed value.
        hex: u32,
    },
    /// Free text.
    Text {
        /// Current content.
        value: String,
    },
}

impl DocState {
    /// Kind tag name, for logs.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Folder { .. } => "folder",
            Self::Slider { .. } => "slider",
            Self::Vector2 { .. } => "vector2",
            Self::Toggle { .. } => "toggle",
            Self::Radio { .. } => "radio",
            Self::Color { .. } => "color",
            Self::Text { .. } => "text",
        }
    }
}

/// A whole-tree snapshot. Immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// The root folder entry (empty path).
    pub root: DocEntry,
}

impl Document {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Capture every persisted field of the tree into a document.
///
/// Preview nodes are skipped entirely; geometry and interaction flags
/// are never written.
#[must_use]
pub fn snapshot(tree: &NodeTree) -> Document {
    Document {
        root: snapshot_node(tree, tree.root()),
    }
}

fn snapshot_node(tree: &NodeTree, id: NodeId) -> DocEntry {
    let node = tree.node(id);
    let state = match &node.kind {
        NodeKind::Folder(folder) => DocState::Folder {
            screen_x: folder.placement.map(|p| p.x),
            screen_y: folder.placement.map(|p| p.y),
            closed: folder.placement.map(|p| p.closed),
            children: node
                .children
                .iter()
                .filter(|c| tree.node(**c).kind.persists())
                .map(|c| snapshot_node(tree, *c))
                .collect(),
        },
        NodeKind::Slider(s) => DocState::Slider {
            value: s.value,
            precision_index: s.precision_index,
            precision_step: s.precision_step(),
        },
        NodeKind::Vector2(v) => DocState::Vector2 {
            x: v.value.x,
            y: v.value.y,
            precision_index: v.precision_index,
            precision_step: v.precision_step(),
        },
        NodeKind::Toggle(t) => DocState::Toggle { checked: t.checked },
        NodeKind::Radio(r) => DocState::Radio {
            selected: r.selected_option().to_string(),
        },
        NodeKind::Color(c) => DocState::Color { hex: c.hex },
        NodeKind::Text(t) => DocState::Text {
            value: t.value.clone(),
        },
        // Previews are filtered out by the parent; unreachable here
        // only if the root itself were a preview, which it never is.
        NodeKind::Preview => DocState::Text {
            value: String::new(),
        },
    };
    DocEntry {
        path: node.path.clone(),
        state,
    }
}

/// Overwrite a live node's persisted fields from a document state.
///
/// A kind mismatch (the saved entry and the retained node disagree) is
/// skipped with a warning, never fatal.
pub fn apply_state(tree: &mut NodeTree, id: NodeId, state: &DocState) {
    let node = tree.node_mut(id);
    match (&mut node.kind, state) {
        (
            NodeKind::Folder(folder),
            DocState::Folder {
                screen_x: Some(x),
                screen_y: Some(y),
                closed,
                ..
            },
        ) => {
            folder.placement = Some(WindowPlacement {
                x: *x,
                y: *y,
                closed: closed.unwrap_or(false),
            });
        }
        (NodeKind::Folder(_), DocState::Folder { .. }) => {
            // Folder without a saved placement: nothing to overwrite.
        }
        (
            NodeKind::Slider(slider),
            DocState::Slider {
                value,
                precision_index,
                ..
            },
        ) => {
            slider.set_value(*value);
            slider.precision_index = (*precision_index).min(PRECISION_LADDER.len() - 1);
        }
        (
            NodeKind::Vector2(vector),
            DocState::Vector2 {
                x,
                y,
                precision_index,
                ..
            },
        ) => {
            vector.set(Vec2::new(*x, *y));
            vector.precision_index = (*precision_index).min(PRECISION_LADDER.len() - 1);
        }
        (NodeKind::Toggle(toggle), DocState::Toggle { checked }) => {
            toggle.checked = *checked;
        }
        (NodeKind::Radio(radio), DocState::Radio { selected }) => {
            radio.select(selected);
        }
        (NodeKind::Color(color), DocState::Color { hex }) => {
            color.hex = *hex;
        }
        (NodeKind::Text(text), DocState::Text { value }) => {
            text.value.clone_from(value);
        }
        (kind, state) => {
            warn!(
                path = %node.path,
                node_kind = kind.name(),
                saved_kind = state.kind_name(),
                "saved state kind does not match node, skipping"
            );
        }
    }
}

/// Restore a document into the tree, breadth-first.
///
/// Every entry is recorded in `pending` (path → state) whether or not
/// a live node matched, so restore-on-create can overwrite nodes
/// declared later. Unmatched paths are not an error.
pub fn restore(doc: &Document, tree: &mut NodeTree, pending: &mut AHashMap<String, DocState>) {
    pending.clear();
    let mut queue: VecDeque<&DocEntry> = VecDeque::new();
    queue.push_back(&doc.root);
    while let Some(entry) = queue.pop_front() {
        if let Some(id) = tree.find(&entry.path) {
            apply_state(tree, id, &entry.state);
        }
        pending.insert(entry.path.clone(), entry.state.clone());
        if let DocState::Folder { children, .. } = &entry.state {
            for child in children {
                queue.push_back(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use twk_tree::{ColorState, RadioState, SliderState, TextState, ToggleState, Vector2State};

    fn sample_tree() -> NodeTree {
        let mut tree = NodeTree::new();
        tree.find_or_create("scene/shape/rotation", || {
            NodeKind::Slider(SliderState::new(45.0))
        })
        .unwrap();
        tree.find_or_create("scene/paused", || {
            NodeKind::Toggle(ToggleState { checked: true })
        })
        .unwrap();
        tree.find_or_create("scene/mode", || {
            NodeKind::Radio(RadioState::new(vec!["a".into(), "b".into()], "b"))
        })
        .unwrap();
        tree.find_or_create("scene/tint", || {
            NodeKind::Color(ColorState { hex: 0xFF00_FF00 })
        })
        .unwrap();
        tree.find_or_create("scene/offset", || {
            NodeKind::Vector2(Vector2State::new(3.0, -7.5))
        })
        .unwrap();
        tree.find_or_create("label", || {
            NodeKind::Text(TextState {
                value: "hello".into(),
            })
        })
        .unwrap();
        tree
    }

    #[test]
    fn snapshot_mirrors_tree_shape() {
        let tree = sample_tree();
        let doc = snapshot(&tree);
        assert_eq!(doc.root.path, "");
        let DocState::Folder { children, .. } = &doc.root.state else {
            panic!("root must be a folder entry");
        };
        let paths: Vec<_> = children.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths, vec!["scene", "label"]);
    }

    #[test]
    fn preview_nodes_are_not_written() {
        let mut tree = sample_tree();
        tree.find_or_create("scene/fps", || NodeKind::Preview).unwrap();
        let doc = snapshot(&tree);
        let json = doc.to_json().unwrap();
        assert!(!json.contains("scene/fps"));
    }

    #[test]
    fn round_trip_is_a_no_op() {
        let mut tree = sample_tree();
        let before = snapshot(&tree);
        let mut pending = AHashMap::new();
        restore(&before, &mut tree, &mut pending);
        let after = snapshot(&tree);
        assert_eq!(before, after);
    }

    #[test]
    fn restore_overwrites_matching_values() {
        let mut tree = sample_tree();
        let doc = snapshot(&tree);
        // Mutate after the snapshot.
        let id = tree.find("scene/shape/rotation").unwrap();
        if let NodeKind::Slider(s) = &mut tree.node_mut(id).kind {
            s.set_value(99.0);
        }
        let mut pending = AHashMap::new();
        restore(&doc, &mut tree, &mut pending);
        let NodeKind::Slider(s) = &tree.node(id).kind else {
            panic!()
        };
        assert_eq!(s.value, 45.0);
    }

    #[test]
    fn unmatched_paths_go_to_pending() {
        let tree = sample_tree();
        let doc = snapshot(&tree);
        let mut empty = NodeTree::new();
        let mut pending = AHashMap::new();
        restore(&doc, &mut empty, &mut pending);
        assert!(pending.contains_key("scene/shape/rotation"));
        assert!(pending.contains_key("label"));
        // The empty tree gained no nodes from the restore.
        assert!(empty.is_empty());
    }

    #[test]
    fn vector_components_restore_together() {
        let mut tree = sample_tree();
        let doc = snapshot(&tree);
        let id = tree.find("scene/offset").unwrap();
        if let NodeKind::Vector2(v) = &mut tree.node_mut(id).kind {
            v.set(Vec2::new(99.0, 99.0));
        }
        let mut pending = AHashMap::new();
        restore(&doc, &mut tree, &mut pending);
        let NodeKind::Vector2(v) = &tree.node(id).kind else {
            panic!()
        };
        assert_eq!(v.value, Vec2::new(3.0, -7.5));
    }

    #[test]
    fn kind_mismatch_is_skipped() {
        let mut tree = NodeTree::new();
        tree.find_or_create("x", || NodeKind::Toggle(ToggleState { checked: false }))
            .unwrap();
        let saved = Document {
            root: DocEntry {
                path: String::new(),
                state: DocState::Folder {
                    screen_x: None,
                    screen_y: None,
                    closed: None,
                    children: vec![DocEntry {
                        path: "x".into(),
                        state: DocState::Slider {
                            value: 5.0,
                            precision_index: 2,
                            precision_step: 0.1,
                        },
                    }],
                },
            },
        };
        let mut pending = AHashMap::new();
        restore(&saved, &mut tree, &mut pending);
        let id = tree.find("x").unwrap();
        let NodeKind::Toggle(t) = &tree.node(id).kind else {
            panic!()
        };
        assert!(!t.checked, "mismatched entry must not corrupt the node");
    }

    #[test]
    fn json_round_trip() {
        let tree = sample_tree();
        let doc = snapshot(&tree);
        let json = doc.to_json().unwrap();
        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(doc, parsed);
    }

    #[test]
    fn malformed_json_is_an_error_not_a_panic() {
        assert!(Document::from_json("{not json").is_err());
        assert!(Document::from_json("{\"path\": \"\", \"kind\": \"nonsense\"}").is_err());
    }

    #[test]
    fn window_placement_round_trips_through_folder_entry() {
        let mut tree = NodeTree::new();
        let id = tree.ensure_folder("panel").unwrap();
        if let NodeKind::Folder(f) = &mut tree.node_mut(id).kind {
            f.placement = Some(WindowPlacement {
                x: 120.0,
                y: 48.0,
                closed: true,
            });
        }
        let doc = snapshot(&tree);
        let mut fresh = NodeTree::new();
        let fresh_id = fresh.ensure_folder("panel").unwrap();
        let mut pending = AHashMap::new();
        restore(&doc, &mut fresh, &mut pending);
        let NodeKind::Folder(f) = &fresh.node(fresh_id).kind else {
            panic!()
        };
        let p = f.placement.expect("placement restored");
        assert_eq!((p.x, p.y, p.closed), (120.0, 48.0, true));
    }

    proptest! {
        // Serializing then restoring never changes any persisted value.
        #[test]
        fn prop_round_trip_stable(value in -1e6f32..1e6, checked: bool) {
            let mut tree = NodeTree::new();
            tree.find_or_create("s", || NodeKind::Slider(SliderState::new(value))).unwrap();
            tree.find_or_create("t", || NodeKind::Toggle(ToggleState { checked })).unwrap();
            let before = snapshot(&tree);
            let mut pending = AHashMap::new();
            restore(&before, &mut tree, &mut pending);
            prop_assert_eq!(before, snapshot(&tree));
        }
    }
}
