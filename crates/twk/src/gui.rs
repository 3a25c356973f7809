#![forbid(unsafe_code)]

//! The overlay context object.
//!
//! [`Gui`] owns the node tree, the window manager, the input
//! dispatcher, and the persistence engine, wired together behind the
//! per-frame accessor API. There are no globals; hosts may run several
//! independent instances (and the tests do).
//!
//! # Frame protocol
//!
//! ```text
//! host frame:
//!   gui.begin_frame(w, h)
//!   gui.publish_pointer_event(..) / gui.publish_key_event(..)   per raw event
//!   value = gui.slider("scene/speed", 1.0)                      accessors, any order
//!   gui.draw(&mut painter)
//! ```
//!
//! Accessors address widgets by slash-delimited path and return the
//! current value; the tree retains state across frames, so a path that
//! stops being requested simply stops being drawn.

use tracing::{error, info, warn};
use twk_core::{
    EventOutcome, KeyEvent, PointerButton, PointerEvent, PointerEventKind, Rect, Vec2,
};
use twk_input::{GlobalShortcut, InputDispatcher, KeyDispatch, SubscriberId};
use twk_persist::{PersistError, SaveInfo, SaveStore, StateEngine};
use twk_tree::{path, NodeId, NodeKind, NodeTree, RadioState, SliderState, Vector2State};
use twk_windows::{Window, WindowId, WindowManager};

use crate::paint::{GuiPainter, RowInfo, RowWidget, WindowChrome};
use crate::settings::GuiSettings;

const fn subscriber(id: WindowId) -> SubscriberId {
    SubscriberId(id.0 as u64)
}

/// Value of a draggable row at press time; the release commits only
/// if the value actually changed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PressedValue {
    Slider(f32),
    Vector(Vec2),
}

/// The row pressed most recently, pending its release.
#[derive(Debug, Clone, Copy)]
struct ActiveNode {
    id: NodeId,
    window: WindowId,
    pressed: Option<PressedValue>,
}

/// The embeddable tweak overlay.
pub struct Gui {
    tree: NodeTree,
    windows: WindowManager,
    input: InputDispatcher,
    engine: StateEngine,
    store: SaveStore,
    folder_stack: Vec<String>,
    active: Option<ActiveNode>,
    cell: f32,
    screen: Vec2,
    hidden: bool,
    autosave_on_shutdown: bool,
}

impl Gui {
    /// Build an overlay from settings.
    ///
    /// Creates the save directory (the one unrecoverable startup
    /// condition), opens the root window, and optionally restores the
    /// most recent save. A malformed save is logged and skipped; the
    /// tree keeps its defaults.
    pub fn new(settings: GuiSettings) -> Result<Self, PersistError> {
        let store = SaveStore::new(&settings.save_dir, &settings.app_name)?;
        let mut tree = NodeTree::new();
        let mut engine = StateEngine::new();
        let mut windows = WindowManager::new();
        let cell = settings.cell_size;
        windows.set_grid_cell(cell);
        let root = windows.open_window("", Vec2::new(cell, cell), cell, false);
        let mut input = InputDispatcher::new();
        input.subscribe(subscriber(root));

        if settings.load_latest_on_startup {
            match store.load_most_recent() {
                Ok(Some(doc)) => {
                    engine.restore_document(&doc, &mut tree);
                    windows.apply_placements(&tree);
                    info!("restored most recent save");
                }
                Ok(None) => {}
                Err(err) => warn!(%err, "could not load most recent save, keeping defaults"),
            }
        }

        Ok(Self {
            tree,
            windows,
            input,
            engine,
            store,
            folder_stack: Vec::new(),
            active: None,
            cell,
            screen: Vec2::ZERO,
            hidden: false,
            autosave_on_shutdown: settings.autosave_on_shutdown,
        })
    }

    // ------------------------------------------------------------------
    // Frame entry points
    // ------------------------------------------------------------------

    /// Start a frame: records the frame for the autosave heuristic,
    /// eases off-screen windows back, and lays out every row.
    pub fn begin_frame(&mut self, screen_w: f32, screen_h: f32) {
        self.engine.note_frame();
        self.screen = Vec2::new(screen_w, screen_h);
        if !self.hidden {
            self.windows.constrain_all(screen_w, screen_h);
            self.layout();
        }
    }

    /// Feed one raw key event. Returns whether the overlay consumed it.
    ///
    /// The reserved shortcuts (primary modifier + Z / Y) trigger undo
    /// and redo ahead of everything else. A hidden overlay ignores all
    /// input.
    pub fn publish_key_event(&mut self, event: KeyEvent) -> bool {
        if self.hidden {
            return false;
        }
        match self.input.publish_key(event, |_, _| EventOutcome::Ignored) {
            KeyDispatch::Intercepted(GlobalShortcut::Undo) => {
                self.undo();
                true
            }
            KeyDispatch::Intercepted(GlobalShortcut::Redo) => {
                self.redo();
                true
            }
            KeyDispatch::Delivered { consumed } => consumed,
        }
    }

    /// Feed one raw pointer event. Returns whether the overlay
    /// consumed it; an unconsumed press also sets
    /// [`mouse_falls_through`](Self::mouse_falls_through).
    pub fn publish_pointer_event(
        &mut self,
        kind: PointerEventKind,
        pos: Vec2,
        button: PointerButton,
    ) -> bool {
        if self.hidden {
            return false;
        }
        let mut promote: Option<(String, Vec2)> = None;
        let mut commit = false;
        let mut gesture_started = false;
        let Self {
            tree,
            windows,
            input,
            active,
            ..
        } = self;
        // Every press starts fresh: a gesture whose release never
        // arrived (the press fell through, or focus moved away) must
        // not keep claiming drag events.
        if matches!(kind, PointerEventKind::Press)
            && let Some(stale) = active.take()
        {
            tree.node_mut(stale.id).dragged = false;
        }
        let consumed = input.publish_pointer(kind, pos, button, |sub, event| {
            deliver_pointer(
                tree,
                windows,
                active,
                &mut promote,
                &mut commit,
                &mut gesture_started,
                WindowId(sub.0 as u32),
                event,
            )
        });
        if gesture_started {
            // Pre-action snapshot: the press lands before any value
            // change, so undoing the gesture returns exactly here.
            self.windows.sync_placements(&mut self.tree);
            self.engine.begin_gesture(&self.tree);
        }
        if commit {
            self.windows.sync_placements(&mut self.tree);
            self.engine.commit(&self.tree);
        }
        if let Some((folder_path, at)) = promote {
            self.promote_folder(&folder_path, at);
        }
        self.sync_input_order();
        if matches!(kind, PointerEventKind::Move) {
            self.update_hover(pos);
        }
        consumed
    }

    /// Whether the most recent press hit no window, so the host may
    /// use it for its own canvas picking. Always true while hidden.
    #[must_use]
    pub fn mouse_falls_through(&self) -> bool {
        self.hidden || self.input.mouse_fell_through()
    }

    /// Draw every open window back to front through the painter.
    /// Hidden overlays draw nothing.
    pub fn draw(&mut self, painter: &mut impl GuiPainter) {
        if self.hidden {
            return;
        }
        self.layout();
        for window in self.windows.draw_order() {
            let Some(folder) = self.tree.find(&window.folder_path) else {
                continue;
            };
            let title = &self.tree.node(folder).name;
            painter.window_chrome(&WindowChrome {
                rect: window.window_rect(),
                title_bar: window.title_bar_rect(),
                close_button: window.close_button_rect(),
                title,
                path_segments: path::segments(&window.folder_path).collect(),
                focused: self.windows.is_focused(window.id),
            });
            for &child in self.tree.children(folder) {
                let node = self.tree.node(child);
                let widget = match &node.kind {
                    NodeKind::Folder(_) => RowWidget::Folder {
                        open: self
                            .windows
                            .window_for_folder(&node.path)
                            .is_some_and(|id| !self.windows.window(id).closed),
                    },
                    NodeKind::Slider(s) => RowWidget::Slider {
                        value: s.value,
                        step: s.precision_step(),
                    },
                    NodeKind::Vector2(v) => RowWidget::Vector2 {
                        x: v.value.x,
                        y: v.value.y,
                        step: v.precision_step(),
                    },
                    NodeKind::Toggle(t) => RowWidget::Toggle { checked: t.checked },
                    NodeKind::Radio(r) => RowWidget::Radio {
                        selected: r.selected_option(),
                    },
                    NodeKind::Color(c) => RowWidget::Color { hex: c.hex },
                    NodeKind::Text(t) => RowWidget::Text { value: &t.value },
                    NodeKind::Preview => RowWidget::Preview,
                };
                painter.row(&RowInfo {
                    rect: node.rect,
                    path: &node.path,
                    name: &node.name,
                    hovered: node.hovered,
                    dragged: node.dragged,
                    widget,
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Unconstrained float slider. The default seeds the first call.
    pub fn slider(&mut self, p: &str, default: f32) -> f32 {
        let Some(id) = self.request(p, || NodeKind::Slider(SliderState::new(default))) else {
            return default;
        };
        match &self.tree.node(id).kind {
            NodeKind::Slider(s) => s.value,
            other => {
                self.warn_kind(p, "slider", other.name());
                default
            }
        }
    }

    /// Slider clamped to `[min, max]`. The first call's bounds hold
    /// for the node's lifetime; later bounds are ignored.
    pub fn slider_constrained(&mut self, p: &str, default: f32, min: f32, max: f32) -> f32 {
        let Some(id) = self.request(p, || {
            NodeKind::Slider(SliderState::constrained(default, min, max))
        }) else {
            return default;
        };
        match &self.tree.node(id).kind {
            NodeKind::Slider(s) => s.value,
            other => {
                self.warn_kind(p, "slider", other.name());
                default
            }
        }
    }

    /// 2D vector. A drag moves both components by the pointer delta
    /// times the precision step; the wheel shifts precision like a
    /// slider's.
    pub fn vector2(&mut self, p: &str, default: Vec2) -> Vec2 {
        let Some(id) = self.request(p, || {
            NodeKind::Vector2(Vector2State::new(default.x, default.y))
        }) else {
            return default;
        };
        match &self.tree.node(id).kind {
            NodeKind::Vector2(v) => v.value,
            other => {
                self.warn_kind(p, "vector2", other.name());
                default
            }
        }
    }

    /// Boolean toggle.
    pub fn toggle(&mut self, p: &str, default: bool) -> bool {
        let Some(id) = self.request(p, || {
            NodeKind::Toggle(twk_tree::ToggleState { checked: default })
        }) else {
            return default;
        };
        match &self.tree.node(id).kind {
            NodeKind::Toggle(t) => t.checked,
            other => {
                self.warn_kind(p, "toggle", other.name());
                default
            }
        }
    }

    /// One-of-N string picker. Options are fixed by the first call;
    /// clicking the row cycles the selection.
    pub fn radio(&mut self, p: &str, options: &[&str], default: &str) -> String {
        let Some(id) = self.request(p, || {
            let opts = options.iter().map(|o| (*o).to_string()).collect();
            NodeKind::Radio(RadioState::new(opts, default))
        }) else {
            return default.to_string();
        };
        match &self.tree.node(id).kind {
            NodeKind::Radio(r) => r.selected_option().to_string(),
            other => {
                self.warn_kind(p, "radio", other.name());
                default.to_string()
            }
        }
    }

    /// Color value as packed 0xAARRGGBB. The overlay draws a swatch;
    /// editing is host-side (via [`color_set`](Self::color_set)).
    pub fn color_picker(&mut self, p: &str, default: u32) -> u32 {
        let Some(id) = self.request(p, || {
            NodeKind::Color(twk_tree::ColorState { hex: default })
        }) else {
            return default;
        };
        match &self.tree.node(id).kind {
            NodeKind::Color(c) => c.hex,
            other => {
                self.warn_kind(p, "color", other.name());
                default
            }
        }
    }

    /// Text row, read-only in the overlay; written through
    /// [`text_set`](Self::text_set).
    pub fn text(&mut self, p: &str, default: &str) -> String {
        let Some(id) = self.request(p, || {
            NodeKind::Text(twk_tree::TextState {
                value: default.to_string(),
            })
        }) else {
            return default.to_string();
        };
        match &self.tree.node(id).kind {
            NodeKind::Text(t) => t.value.clone(),
            other => {
                self.warn_kind(p, "text", other.name());
                default.to_string()
            }
        }
    }

    /// Declare a folder without any leaf under it yet.
    pub fn folder(&mut self, p: &str) {
        let full = self.full_path(p);
        let created = self.tree.find(&full).is_none();
        match self.tree.ensure_folder(&full) {
            Ok(id) => {
                if created {
                    self.engine.overwrite_from_pending(&mut self.tree, id);
                    self.open_top_level_window(&full);
                }
            }
            Err(err) => warn!(%err, "folder request ignored"),
        }
    }

    /// Declare a host-drawn preview row. Never persisted.
    pub fn preview(&mut self, p: &str) {
        let _ = self.request(p, || NodeKind::Preview);
    }

    /// Prefix subsequent relative paths with `name`.
    pub fn push_folder(&mut self, name: &str) {
        self.folder_stack.push(name.to_string());
    }

    /// Pop the innermost folder prefix.
    pub fn pop_folder(&mut self) {
        if self.folder_stack.pop().is_none() {
            warn!("pop_folder with an empty folder stack");
        }
    }

    // ------------------------------------------------------------------
    // Programmatic setters
    // ------------------------------------------------------------------

    /// Write a slider value, creating the node if needed. Captured by
    /// the next commit point rather than committing itself.
    pub fn slider_set(&mut self, p: &str, value: f32) {
        if let Some(id) = self.request(p, || NodeKind::Slider(SliderState::new(value))) {
            if let NodeKind::Slider(s) = &mut self.tree.node_mut(id).kind {
                s.set_value(value);
            }
        }
    }

    /// Write a vector value, creating the node if needed.
    pub fn vector2_set(&mut self, p: &str, value: Vec2) {
        if let Some(id) = self.request(p, || {
            NodeKind::Vector2(Vector2State::new(value.x, value.y))
        }) {
            if let NodeKind::Vector2(v) = &mut self.tree.node_mut(id).kind {
                v.set(value);
            }
        }
    }

    /// Write a toggle value, creating the node if needed.
    pub fn toggle_set(&mut self, p: &str, value: bool) {
        if let Some(id) = self.request(p, || {
            NodeKind::Toggle(twk_tree::ToggleState { checked: value })
        }) {
            if let NodeKind::Toggle(t) = &mut self.tree.node_mut(id).kind {
                t.checked = value;
            }
        }
    }

    /// Select a radio option by text. The radio must already exist
    /// (options come from its accessor); unknown options are ignored.
    pub fn radio_set(&mut self, p: &str, option: &str) {
        let full = self.full_path(p);
        let Some(id) = self.tree.find(&full) else {
            warn!(path = %full, "radio_set on a path that does not exist");
            return;
        };
        if let NodeKind::Radio(r) = &mut self.tree.node_mut(id).kind {
            r.select(option);
        }
    }

    /// Write a color value, creating the node if needed.
    pub fn color_set(&mut self, p: &str, hex: u32) {
        if let Some(id) = self.request(p, || NodeKind::Color(twk_tree::ColorState { hex })) {
            if let NodeKind::Color(c) = &mut self.tree.node_mut(id).kind {
                c.hex = hex;
            }
        }
    }

    /// Write a text value, creating the node if needed.
    pub fn text_set(&mut self, p: &str, value: &str) {
        if let Some(id) = self.request(p, || {
            NodeKind::Text(twk_tree::TextState {
                value: value.to_string(),
            })
        }) {
            if let NodeKind::Text(t) = &mut self.tree.node_mut(id).kind {
                t.value = value.to_string();
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Undo the most recent commit. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let changed = self.engine.undo(&mut self.tree);
        if changed {
            self.windows.apply_placements(&self.tree);
        }
        changed
    }

    /// Redo the most recently undone commit.
    pub fn redo(&mut self) -> bool {
        let changed = self.engine.redo(&mut self.tree);
        if changed {
            self.windows.apply_placements(&self.tree);
        }
        changed
    }

    /// Whether undo is currently available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    /// Whether redo is currently available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    /// Save the current state under `name` (json plus a tree preview).
    pub fn save_as(&mut self, name: &str) -> Result<(), PersistError> {
        self.windows.sync_placements(&mut self.tree);
        let doc = self.engine.current_document(&self.tree);
        self.store.save(name, &doc, &self.tree.pretty_print())
    }

    /// Save under a short generated name; returns the name used.
    pub fn save_with_generated_name(&mut self) -> Result<String, PersistError> {
        let name = self.store.generated_name();
        self.save_as(&name)?;
        Ok(name)
    }

    /// Load a named save into the tree. Not an undoable gesture.
    pub fn load_save(&mut self, name: &str) -> Result<(), PersistError> {
        let doc = self.store.load(name)?;
        self.engine.restore_document(&doc, &mut self.tree);
        self.windows.apply_placements(&self.tree);
        Ok(())
    }

    /// Delete a named save and its preview.
    pub fn delete_save(&self, name: &str) -> Result<(), PersistError> {
        self.store.delete(name)
    }

    /// Rename a save.
    pub fn rename_save(&self, old: &str, new: &str) -> Result<(), PersistError> {
        self.store.rename(old, new)
    }

    /// List saves, most recently modified first.
    pub fn list_saves(&self) -> Result<Vec<SaveInfo>, PersistError> {
        self.store.list()
    }

    /// Write the autosave now, unless the stuck-frame heuristic trips.
    pub fn create_autosave(&mut self) -> Result<bool, PersistError> {
        self.windows.sync_placements(&mut self.tree);
        self.engine.create_autosave(&self.tree, &self.store)
    }

    /// Graceful-shutdown hook the host invokes after its frame loop
    /// has stopped. Writes the autosave when enabled.
    pub fn shutdown(&mut self) {
        if self.autosave_on_shutdown {
            if let Err(err) = self.create_autosave() {
                error!(%err, "autosave on shutdown failed");
            }
        }
    }

    /// Toggle grid snapping for window drops. Enabling immediately
    /// re-snaps every window not being dragged.
    pub fn set_grid_snap(&mut self, enabled: bool) {
        self.windows.set_grid_enabled(enabled);
    }

    /// Change the grid cell size (row height, title bars, snap grid).
    pub fn set_cell_size(&mut self, cell: f32) {
        if cell <= 0.0 {
            warn!(cell, "ignoring non-positive cell size");
            return;
        }
        self.cell = cell;
        for i in 0..self.windows.len() {
            self.windows.window_mut(WindowId(i as u32)).set_cell(cell);
        }
        self.windows.set_grid_cell(cell);
    }

    /// Hide the overlay: draws nothing, ignores all input.
    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Show the overlay again.
    pub fn show(&mut self) {
        self.hidden = false;
    }

    /// Whether the overlay is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Screen rectangle of the row at an absolute path, as of the last
    /// layout pass.
    #[must_use]
    pub fn node_rect(&self, p: &str) -> Option<Rect> {
        self.tree.find(p).map(|id| self.tree.node(id).rect)
    }

    /// Screen rectangle of the open window bound to a folder path.
    #[must_use]
    pub fn window_rect(&self, folder_path: &str) -> Option<Rect> {
        let id = self.windows.window_for_folder(folder_path)?;
        let window = self.windows.window(id);
        (!window.closed).then(|| window.window_rect())
    }

    /// Folder path of the focused (front, open) window.
    #[must_use]
    pub fn focused_folder(&self) -> Option<&str> {
        let id = self.windows.z_order().first()?;
        let window = self.windows.window(*id);
        (!window.closed).then_some(window.folder_path.as_str())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Resolve a request through the folder stack, creating the node
    /// on first sight (with restore-on-create and window creation for
    /// new top-level folders). Path conflicts are logged and ignored.
    fn request(&mut self, p: &str, make: impl FnOnce() -> NodeKind) -> Option<NodeId> {
        let full = self.full_path(p);
        let created = self.tree.find(&full).is_none();
        match self.tree.find_or_create(&full, make) {
            Ok(id) => {
                if created {
                    self.engine.overwrite_from_pending(&mut self.tree, id);
                    self.open_top_level_window(&full);
                }
                Some(id)
            }
            Err(err) => {
                warn!(%err, "widget request ignored");
                None
            }
        }
    }

    fn warn_kind(&self, p: &str, expected: &'static str, found: &'static str) {
        warn!(path = p, expected, found, "widget kind mismatch, returning the default");
    }

    fn full_path(&self, p: &str) -> String {
        let mut base = String::new();
        for segment in &self.folder_stack {
            base = path::join(&base, segment);
        }
        path::join(&base, p)
    }

    /// Open the window for `full`'s top-level folder if it has none
    /// yet. Nested folders wait for explicit promotion (a click on
    /// their row).
    fn open_top_level_window(&mut self, full: &str) {
        let Some(top) = path::segments(full).next() else {
            return;
        };
        let Some(id) = self.tree.find(top) else {
            return;
        };
        if !self.tree.node(id).kind.is_folder() {
            return;
        }
        if self.windows.window_for_folder(top).is_some() {
            return;
        }
        let n = self.windows.len() as f32;
        let pos = Vec2::new(self.cell * (1.0 + 2.0 * n), self.cell);
        let wid = self.windows.open_window(top, pos, self.cell, true);
        self.input.subscribe(subscriber(wid));
        // A restored placement may already know where this window goes.
        self.windows.apply_placements(&self.tree);
    }

    /// Open (or refocus) the window bound to a clicked folder row.
    /// The window appears at the click, nudged back onto the screen.
    fn promote_folder(&mut self, folder_path: &str, at: Vec2) {
        let pos = Vec2::new(
            at.x.min((self.screen.x - self.cell * 2.0).max(0.0)),
            at.y.min((self.screen.y - self.cell * 2.0).max(0.0)),
        );
        let wid = self.windows.open_window(folder_path, pos, self.cell, true);
        self.windows.set_focus(wid);
        self.input.set_focus(subscriber(wid));
    }

    /// Mirror the window z-order into the dispatcher's delivery order.
    fn sync_input_order(&mut self) {
        let order: Vec<WindowId> = self.windows.z_order().to_vec();
        for wid in order.into_iter().rev() {
            self.input.set_focus(subscriber(wid));
        }
    }

    /// Recompute every open window's height and its rows' rectangles.
    fn layout(&mut self) {
        let order: Vec<WindowId> = self.windows.z_order().to_vec();
        for wid in order {
            if self.windows.window(wid).closed {
                continue;
            }
            let Some(folder) = self.tree.find(&self.windows.window(wid).folder_path) else {
                continue;
            };
            let children: Vec<NodeId> = self.tree.children(folder).to_vec();
            self.windows
                .window_mut(wid)
                .set_content_rows(children.len() as u32);
            let content = self.windows.window(wid).content_rect();
            for (i, id) in children.into_iter().enumerate() {
                let node = self.tree.node_mut(id);
                node.rect = Rect::new(
                    content.x,
                    content.y + i as f32 * self.cell,
                    content.width,
                    self.cell,
                );
                node.row_cells = 1;
            }
        }
    }

    /// Resolve hover to at most one row, in the topmost window under
    /// the pointer.
    fn update_hover(&mut self, pos: Vec2) {
        let hovered = self
            .windows
            .topmost_window_at(pos.x, pos.y)
            .and_then(|wid| hit_row(&self.tree, self.windows.window(wid), pos));
        if let Some(id) = hovered {
            self.tree.node_mut(id).hovered = true;
        }
        self.tree.clear_hover_except(hovered);
    }
}

/// The content row of `window` containing `pos`, if any.
fn hit_row(tree: &NodeTree, window: &Window, pos: Vec2) -> Option<NodeId> {
    if !window.content_rect().contains(pos.x, pos.y) {
        return None;
    }
    let folder = tree.find(&window.folder_path)?;
    tree.children(folder)
        .iter()
        .copied()
        .find(|id| tree.node(*id).rect.contains(pos.x, pos.y))
}

/// Per-window pointer delivery: widget interactions first where one is
/// active, window chrome (focus, title drag, close) otherwise.
fn deliver_pointer(
    tree: &mut NodeTree,
    windows: &mut WindowManager,
    active: &mut Option<ActiveNode>,
    promote: &mut Option<(String, Vec2)>,
    commit: &mut bool,
    gesture_started: &mut bool,
    wid: WindowId,
    event: &PointerEvent,
) -> EventOutcome {
    if windows.window(wid).closed {
        return EventOutcome::Ignored;
    }
    match event.kind {
        PointerEventKind::Press => {
            let response = windows.handle_pointer(wid, event);
            if response.consumed {
                if let Some(id) = hit_row(tree, windows.window(wid), event.pos) {
                    let pressed = match &tree.node(id).kind {
                        NodeKind::Slider(s) => Some(PressedValue::Slider(s.value)),
                        NodeKind::Vector2(v) => Some(PressedValue::Vector(v.value)),
                        _ => None,
                    };
                    if pressed.is_some() {
                        tree.node_mut(id).dragged = true;
                    }
                    *active = Some(ActiveNode {
                        id,
                        window: wid,
                        pressed,
                    });
                    *gesture_started = true;
                }
            }
            response.outcome()
        }
        PointerEventKind::Drag => {
            if let Some(a) = active.as_ref()
                && a.window == wid
                && a.pressed.is_some()
            {
                let delta = event.delta();
                match &mut tree.node_mut(a.id).kind {
                    NodeKind::Slider(s) => {
                        let step = s.precision_step();
                        s.set_value(s.value + delta.x * step);
                    }
                    NodeKind::Vector2(v) => {
                        let step = v.precision_step();
                        let next = Vec2::new(
                            v.value.x + delta.x * step,
                            v.value.y + delta.y * step,
                        );
                        v.set(next);
                    }
                    _ => {}
                }
                return EventOutcome::Consumed;
            }
            windows.handle_pointer(wid, event).outcome()
        }
        PointerEventKind::Release => {
            let Some(a) = active.take() else {
                return windows.handle_pointer(wid, event).outcome();
            };
            if a.window != wid {
                *active = Some(a);
                return windows.handle_pointer(wid, event).outcome();
            }
            tree.node_mut(a.id).dragged = false;
            let row = tree.node(a.id).rect;
            let clicked = row.contains(event.pos.x, event.pos.y);
            let folder_path = tree.node(a.id).path.clone();
            match &mut tree.node_mut(a.id).kind {
                NodeKind::Slider(s) => {
                    if matches!(a.pressed, Some(PressedValue::Slider(v)) if v != s.value) {
                        *commit = true;
                    }
                }
                NodeKind::Vector2(vec) => {
                    if matches!(a.pressed, Some(PressedValue::Vector(v)) if v != vec.value) {
                        *commit = true;
                    }
                }
                NodeKind::Toggle(t) if clicked => {
                    t.checked = !t.checked;
                    *commit = true;
                }
                NodeKind::Radio(r) if clicked && !r.options.is_empty() => {
                    let next = (r.selected + 1) % r.options.len();
                    if next != r.selected {
                        r.selected = next;
                        *commit = true;
                    }
                }
                NodeKind::Folder(_) if clicked => {
                    *promote = Some((folder_path, event.pos));
                }
                _ => {}
            }
            EventOutcome::Consumed
        }
        PointerEventKind::Wheel(delta) => {
            if delta == 0.0
                || !windows
                    .window(wid)
                    .window_rect()
                    .contains(event.pos.x, event.pos.y)
            {
                return EventOutcome::Ignored;
            }
            if let Some(id) = hit_row(tree, windows.window(wid), event.pos) {
                // Scroll up selects a finer step.
                let steps = if delta > 0.0 { -1 } else { 1 };
                match &mut tree.node_mut(id).kind {
                    NodeKind::Slider(s) => s.shift_precision(steps),
                    NodeKind::Vector2(v) => v.shift_precision(steps),
                    _ => {}
                }
            }
            EventOutcome::Consumed
        }
        PointerEventKind::Move => EventOutcome::Ignored,
    }
}
