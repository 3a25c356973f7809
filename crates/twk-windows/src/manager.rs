#![forbid(unsafe_code)]

//! Window set, focus order, and grid-snap policy.
//!
//! The manager keeps windows in a z-order list (front = index 0 =
//! most recently focused). Pointer presses are routed front to back
//! with a short-circuit: the first window containing the point
//! consumes the event and takes focus; windows behind it never see
//! the event that frame.

use tracing::debug;
use twk_core::{PointerEvent, Vec2};
use twk_tree::{NodeKind, NodeTree, WindowPlacement};

use crate::snap::GridSnap;
use crate::window::{PointerResponse, Window, WindowId};

/// Owns every window and their z-order.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: Vec<Window>,
    /// Front first. Every window id appears exactly once.
    z_order: Vec<WindowId>,
    grid: GridSnap,
}

impl WindowManager {
    /// Create an empty manager with grid snapping off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of windows, closed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no windows exist yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Borrow a window.
    #[must_use]
    pub fn window(&self, id: WindowId) -> &Window {
        &self.windows[id.0 as usize]
    }

    /// Mutably borrow a window.
    #[must_use]
    pub fn window_mut(&mut self, id: WindowId) -> &mut Window {
        &mut self.windows[id.0 as usize]
    }

    /// Find the window bound to a folder path.
    #[must_use]
    pub fn window_for_folder(&self, folder_path: &str) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| w.folder_path == folder_path)
            .map(|w| w.id)
    }

    /// Open a window for `folder_path`, creating it on first request.
    ///
    /// An existing window is reopened in place (`closed` cleared) and
    /// keeps its position; `pos` only seeds brand-new windows.
    pub fn open_window(
        &mut self,
        folder_path: &str,
        pos: Vec2,
        cell: f32,
        closeable: bool,
    ) -> WindowId {
        if let Some(id) = self.window_for_folder(folder_path) {
            self.window_mut(id).open(false);
            return id;
        }
        let id = WindowId(self.windows.len() as u32);
        debug!(folder = folder_path, ?pos, "creating window");
        self.windows
            .push(Window::new(id, folder_path, pos, cell, closeable));
        self.z_order.insert(0, id);
        id
    }

    /// Move a window to the front of the z-order.
    ///
    /// Any other window still flagged as dragged loses the flag here:
    /// focus moved away without a release, and the next press must
    /// start a fresh drag.
    pub fn set_focus(&mut self, id: WindowId) {
        self.z_order.retain(|w| *w != id);
        self.z_order.insert(0, id);
        for window in &mut self.windows {
            if window.id != id {
                window.dragged = false;
            }
        }
    }

    /// True iff the window is at the front of the z-order and open.
    #[must_use]
    pub fn is_focused(&self, id: WindowId) -> bool {
        self.z_order.first() == Some(&id) && !self.window(id).closed
    }

    /// Z-order, front first.
    #[must_use]
    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    /// Open windows back to front, the order they should be drawn in.
    pub fn draw_order(&self) -> impl Iterator<Item = &Window> {
        self.z_order
            .iter()
            .rev()
            .map(|id| self.window(*id))
            .filter(|w| !w.closed)
    }

    /// The window currently being dragged, if any.
    #[must_use]
    pub fn dragged_window(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.dragged).map(|w| w.id)
    }

    /// Deliver a pointer event to one window and apply the manager
    /// side of its response: focus on press, grid snap on drop.
    pub fn handle_pointer(&mut self, id: WindowId, event: &PointerEvent) -> PointerResponse {
        let response = self.window_mut(id).handle_pointer(event);
        if response.wants_focus && !self.is_focused(id) {
            self.set_focus(id);
        }
        if response.drag_ended {
            let snapped = self.grid.snap(self.window(id).pos);
            self.window_mut(id).pos = snapped;
        }
        response
    }

    /// Hit-test a press over all open windows front to back.
    ///
    /// Returns the single window that would consume the press. Used
    /// for tests and host-side queries; live routing goes through the
    /// dispatcher subscriber order, which mirrors this z-order.
    #[must_use]
    pub fn topmost_window_at(&self, x: f32, y: f32) -> Option<WindowId> {
        self.z_order
            .iter()
            .map(|id| self.window(*id))
            .filter(|w| !w.closed)
            .find(|w| w.window_rect().contains(x, y))
            .map(|w| w.id)
    }

    /// Per-frame pass: ease every open window back onto the screen.
    pub fn constrain_all(&mut self, screen_w: f32, screen_h: f32) {
        for window in &mut self.windows {
            if !window.closed {
                window.constrain_to_screen(screen_w, screen_h);
            }
        }
    }

    /// Current grid-snap policy.
    #[must_use]
    pub fn grid(&self) -> GridSnap {
        self.grid
    }

    /// Toggle grid snapping. Turning it on immediately re-snaps every
    /// window not being dragged, not just future drops.
    pub fn set_grid_enabled(&mut self, enabled: bool) {
        let was = self.grid.enabled;
        self.grid.enabled = enabled;
        if enabled && !was {
            self.snap_all_static_windows();
        }
    }

    /// Change the grid cell size, re-snapping all static windows.
    pub fn set_grid_cell(&mut self, cell: f32) {
        if (cell - self.grid.cell).abs() > f32::EPSILON {
            self.grid.cell = cell;
            if self.grid.enabled {
                self.snap_all_static_windows();
            }
        }
    }

    /// Snap every non-dragged open window to the grid.
    pub fn snap_all_static_windows(&mut self) {
        let grid = self.grid;
        for window in &mut self.windows {
            if !window.dragged && !window.closed {
                window.pos = grid.snap(window.pos);
            }
        }
    }

    /// Write every window's placement back onto its folder node, so
    /// the persistence engine sees `{screen_x, screen_y, closed}`
    /// through the tree.
    pub fn sync_placements(&self, tree: &mut NodeTree) {
        for window in &self.windows {
            let Some(id) = tree.find(&window.folder_path) else {
                continue;
            };
            if let NodeKind::Folder(folder) = &mut tree.node_mut(id).kind {
                folder.placement = Some(WindowPlacement {
                    x: window.pos.x,
                    y: window.pos.y,
                    closed: window.closed,
                });
            }
        }
    }

    /// Apply placements read from the tree (after a restore) onto the
    /// live windows bound to those folders.
    pub fn apply_placements(&mut self, tree: &NodeTree) {
        for window in &mut self.windows {
            let Some(id) = tree.find(&window.folder_path) else {
                continue;
            };
            if let NodeKind::Folder(folder) = &tree.node(id).kind
                && let Some(placement) = folder.placement
            {
                window.pos = Vec2::new(placement.x, placement.y);
                window.closed = placement.closed;
            }
        }
    }
}
