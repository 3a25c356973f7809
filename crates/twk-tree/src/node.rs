#![forbid(unsafe_code)]

//! Tree entries: folders, value leaves, and transient previews.
//!
//! A single [`Node`] type carries a [`NodeKind`] tag instead of a
//! subclass hierarchy, so matches over kinds stay exhaustive under the
//! compiler's eye. Per-kind state lives in small structs inside the
//! variant.
//!
//! Geometry (`rect`) and interaction flags (`hovered`, `dragged`) are
//! transient: recomputed every frame from layout, never persisted.

use twk_core::{Rect, Vec2};

use crate::path;

/// Arena index of a node within its [`NodeTree`](crate::NodeTree).
///
/// Ids are stable for the lifetime of the tree; nodes are never
/// removed in normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The arena slot this id refers to.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed ladder of slider step sizes.
///
/// The wheel shifts a slider's precision index along this ladder; a
/// drag changes the value by horizontal delta times the active step.
pub const PRECISION_LADDER: [f32; 6] = [0.001, 0.01, 0.1, 1.0, 10.0, 100.0];

/// Default precision index (step 0.1).
pub const DEFAULT_PRECISION_INDEX: usize = 2;

/// Persistent window placement carried by a window-bound folder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPlacement {
    /// Window screen x.
    pub x: f32,
    /// Window screen y.
    pub y: f32,
    /// Whether the window is closed (it stays in memory regardless).
    pub closed: bool,
}

/// State of a folder node.
///
/// A folder owns an ordered sequence of children (insertion order is
/// display order) and backs zero or one floating window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderState {
    /// Placement of the bound window, once one has been opened.
    pub placement: Option<WindowPlacement>,
}

/// State of a float slider node.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderState {
    /// Current value.
    pub value: f32,
    /// Value supplied by the first accessor call.
    pub default: f32,
    /// Lower bound, meaningful when `constrained`.
    pub min: f32,
    /// Upper bound, meaningful when `constrained`.
    pub max: f32,
    /// Whether min/max clamp every write.
    pub constrained: bool,
    /// Index into [`PRECISION_LADDER`].
    pub precision_index: usize,
}

impl SliderState {
    /// Create an unconstrained slider.
    #[must_use]
    pub fn new(default: f32) -> Self {
        Self {
            value: default,
            default,
            min: f32::NEG_INFINITY,
            max: f32::INFINITY,
            constrained: false,
            precision_index: DEFAULT_PRECISION_INDEX,
        }
    }

    /// Create a constrained slider. Bounds are fixed by this first
    /// call for the node's lifetime.
    #[must_use]
    pub fn constrained(default: f32, min: f32, max: f32) -> Self {
        let mut s = Self::new(default);
        if min < max {
            s.min = min;
            s.max = max;
            s.constrained = true;
            s.value = default.clamp(min, max);
        }
        s
    }

    /// The active step size.
    #[must_use]
    pub fn precision_step(&self) -> f32 {
        PRECISION_LADDER[self.precision_index.min(PRECISION_LADDER.len() - 1)]
    }

    /// Write a value, clamping when constrained and rejecting NaN.
    pub fn set_value(&mut self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.value = if self.constrained {
            value.clamp(self.min, self.max)
        } else {
            value
        };
    }

    /// Shift the precision index by `steps` (wheel direction).
    pub fn shift_precision(&mut self, steps: i32) {
        let max = PRECISION_LADDER.len() as i32 - 1;
        let next = (self.precision_index as i32 + steps).clamp(0, max);
        self.precision_index = next as usize;
    }
}

/// State of a 2D vector node. Both components share one precision
/// index; a drag moves them by the pointer delta times the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2State {
    /// Current value.
    pub value: Vec2,
    /// Index into [`PRECISION_LADDER`].
    pub precision_index: usize,
}

impl Vector2State {
    /// Create a vector from its initial components.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            value: Vec2::new(x, y),
            precision_index: DEFAULT_PRECISION_INDEX,
        }
    }

    /// The active step size.
    #[must_use]
    pub fn precision_step(&self) -> f32 {
        PRECISION_LADDER[self.precision_index.min(PRECISION_LADDER.len() - 1)]
    }

    /// Write both components, rejecting NaN in either.
    pub fn set(&mut self, value: Vec2) {
        if value.x.is_nan() || value.y.is_nan() {
            return;
        }
        self.value = value;
    }

    /// Shift the precision index by `steps` (wheel direction).
    pub fn shift_precision(&mut self, steps: i32) {
        let max = PRECISION_LADDER.len() as i32 - 1;
        let next = (self.precision_index as i32 + steps).clamp(0, max);
        self.precision_index = next as usize;
    }
}

/// State of a boolean toggle node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToggleState {
    /// Current value.
    pub checked: bool,
}

/// State of a radio / string-picker node.
#[derive(Debug, Clone, PartialEq)]
pub struct RadioState {
    /// The options declared by the first accessor call.
    pub options: Vec<String>,
    /// Index of the selected option.
    pub selected: usize,
}

impl RadioState {
    /// Create a radio from options and a default selection.
    ///
    /// An unknown default falls back to the first option.
    #[must_use]
    pub fn new(options: Vec<String>, default: &str) -> Self {
        let selected = options.iter().position(|o| o == default).unwrap_or(0);
        Self { options, selected }
    }

    /// The selected option's text.
    #[must_use]
    pub fn selected_option(&self) -> &str {
        self.options
            .get(self.selected)
            .map_or("", String::as_str)
    }

    /// Select by option text. Unknown options are ignored.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, option: &str) -> bool {
        match self.options.iter().position(|o| o == option) {
            Some(i) if i != self.selected => {
                self.selected = i;
                true
            }
            _ => false,
        }
    }
}

/// State of a color picker node. The value is packed ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorState {
    /// Packed 0xAARRGGBB value.
    pub hex: u32,
}

/// State of a text node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextState {
    /// Current content.
    pub value: String,
}

/// The kind tag and per-kind state of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Contains an ordered set of children; backs zero or one window.
    Folder(FolderState),
    /// Float slider leaf.
    Slider(SliderState),
    /// 2D vector leaf.
    Vector2(Vector2State),
    /// Boolean toggle leaf.
    Toggle(ToggleState),
    /// One-of-N string picker leaf.
    Radio(RadioState),
    /// Color picker leaf.
    Color(ColorState),
    /// Free text leaf.
    Text(TextState),
    /// Drawn but never persisted or matched by path on restore.
    Preview,
}

impl NodeKind {
    /// Stable name used in logs and the persisted document.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Folder(_) => "folder",
            Self::Slider(_) => "slider",
            Self::Vector2(_) => "vector2",
            Self::Toggle(_) => "toggle",
            Self::Radio(_) => "radio",
            Self::Color(_) => "color",
            Self::Text(_) => "text",
            Self::Preview => "preview",
        }
    }

    /// Whether this node can hold children.
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Whether this node survives serialization.
    #[must_use]
    pub const fn persists(&self) -> bool {
        !matches!(self, Self::Preview)
    }
}

/// One entry of the node tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Absolute slash-delimited path; unique within the tree.
    pub path: String,
    /// Display name (last path segment; root displays as "root").
    pub name: String,
    /// Non-owning back-reference to the parent folder.
    pub parent: Option<NodeId>,
    /// Ordered children (folders only). Insertion order = display order.
    pub children: Vec<NodeId>,
    /// Kind tag and per-kind state.
    pub kind: NodeKind,
    /// Position and size within the owning window, recomputed per
    /// frame. Never persisted.
    pub rect: Rect,
    /// Transient hover flag.
    pub hovered: bool,
    /// Transient drag flag.
    pub dragged: bool,
    /// Height of this node's row in grid cells.
    pub row_cells: u32,
}

impl Node {
    /// Create a node at `path` under `parent`.
    #[must_use]
    pub fn new(path: impl Into<String>, parent: Option<NodeId>, kind: NodeKind) -> Self {
        let path = path.into();
        let name = path::leaf_name(&path).to_string();
        Self {
            path,
            name,
            parent,
            children: Vec::new(),
            kind,
            rect: Rect::default(),
            hovered: false,
            dragged: false,
            row_cells: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_unconstrained_accepts_anything_but_nan() {
        let mut s = SliderState::new(0.0);
        s.set_value(1e9);
        assert_eq!(s.value, 1e9);
        s.set_value(f32::NAN);
        assert_eq!(s.value, 1e9);
    }

    #[test]
    fn slider_constrained_clamps() {
        let mut s = SliderState::constrained(0.5, 0.0, 1.0);
        s.set_value(2.0);
        assert_eq!(s.value, 1.0);
        s.set_value(-1.0);
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn slider_inverted_bounds_fall_back_to_unconstrained() {
        let s = SliderState::constrained(0.0, 5.0, 1.0);
        assert!(!s.constrained);
    }

    #[test]
    fn slider_precision_ladder_is_clamped() {
        let mut s = SliderState::new(0.0);
        assert_eq!(s.precision_step(), 0.1);
        s.shift_precision(100);
        assert_eq!(s.precision_step(), 100.0);
        s.shift_precision(-100);
        assert_eq!(s.precision_step(), 0.001);
    }

    #[test]
    fn vector_rejects_nan_components() {
        let mut v = Vector2State::new(1.0, 2.0);
        v.set(Vec2::new(f32::NAN, 5.0));
        assert_eq!(v.value, Vec2::new(1.0, 2.0));
        v.set(Vec2::new(3.0, 4.0));
        assert_eq!(v.value, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn vector_shares_the_slider_precision_ladder() {
        let mut v = Vector2State::new(0.0, 0.0);
        assert_eq!(v.precision_step(), 0.1);
        v.shift_precision(1);
        assert_eq!(v.precision_step(), 1.0);
        v.shift_precision(-100);
        assert_eq!(v.precision_step(), 0.001);
    }

    #[test]
    fn radio_unknown_default_selects_first() {
        let r = RadioState::new(vec!["a".into(), "b".into()], "nope");
        assert_eq!(r.selected_option(), "a");
    }

    #[test]
    fn radio_select_ignores_unknown() {
        let mut r = RadioState::new(vec!["a".into(), "b".into()], "a");
        assert!(r.select("b"));
        assert!(!r.select("zzz"));
        assert_eq!(r.selected_option(), "b");
    }

    #[test]
    fn node_name_comes_from_path() {
        let n = Node::new("scene/shape", None, NodeKind::Folder(FolderState::default()));
        assert_eq!(n.name, "shape");
        let root = Node::new("", None, NodeKind::Folder(FolderState::default()));
        assert_eq!(root.name, "root");
    }

    #[test]
    fn preview_never_persists() {
        assert!(!NodeKind::Preview.persists());
        assert!(NodeKind::Toggle(ToggleState::default()).persists());
    }
}
