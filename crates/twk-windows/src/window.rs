#![forbid(unsafe_code)]

//! One floating window bound to a folder node.
//!
//! A window exclusively owns its screen-space geometry; it references
//! its folder by path and never owns the node. Closing a window only
//! sets `closed`; the window stays in memory and can be reopened.

use twk_core::{geometry::lerp, EventOutcome, PointerEvent, PointerEventKind, Rect, Vec2};

/// Identity of a window within its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// Default window width in grid cells.
pub const DEFAULT_WIDTH_CELLS: f32 = 10.0;

/// Per-frame interpolation factor for the on-screen clamp; the window
/// eases toward the bound instead of jumping.
const CONSTRAIN_LERP: f32 = 0.3;

/// What a window did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// The event was consumed (stops propagation).
    pub consumed: bool,
    /// The window wants focus (press inside it).
    pub wants_focus: bool,
    /// The close button was released; `closed` is now set.
    pub closed_now: bool,
    /// A title-bar drag ended this event (drop point reached).
    pub drag_ended: bool,
}

impl PointerResponse {
    /// As an [`EventOutcome`] for the dispatcher.
    #[must_use]
    pub const fn outcome(&self) -> EventOutcome {
        if self.consumed {
            EventOutcome::Consumed
        } else {
            EventOutcome::Ignored
        }
    }

    const fn consume(mut self) -> Self {
        self.consumed = true;
        self
    }
}

/// A floating, draggable, closeable viewport bound to one folder.
#[derive(Debug, Clone)]
pub struct Window {
    /// Identity within the manager.
    pub id: WindowId,
    /// Path of the bound folder node (not owned).
    pub folder_path: String,
    /// Screen position of the top-left corner.
    pub pos: Vec2,
    /// Screen size; height is recomputed from the row count each frame.
    pub size: Vec2,
    /// Closed windows draw nothing and ignore input.
    pub closed: bool,
    /// Whether the title bar reserves a close button cell.
    pub closeable: bool,
    /// True while the title bar is being dragged.
    pub dragged: bool,
    cell: f32,
}

impl Window {
    /// Create an open window for `folder_path` at `pos`.
    #[must_use]
    pub fn new(
        id: WindowId,
        folder_path: impl Into<String>,
        pos: Vec2,
        cell: f32,
        closeable: bool,
    ) -> Self {
        Self {
            id,
            folder_path: folder_path.into(),
            pos,
            size: Vec2::new(cell * DEFAULT_WIDTH_CELLS, cell),
            closed: false,
            closeable,
            dragged: false,
            cell,
        }
    }

    /// Grid cell size (title bar height).
    #[must_use]
    pub fn cell(&self) -> f32 {
        self.cell
    }

    /// Change the grid cell size. Width tracks the new cell; height
    /// is recomputed by the next layout pass.
    pub fn set_cell(&mut self, cell: f32) {
        self.cell = cell;
        self.size.x = cell * DEFAULT_WIDTH_CELLS;
    }

    /// Resize for `rows` content rows below the title bar.
    pub fn set_content_rows(&mut self, rows: u32) {
        self.size.y = self.cell * (1.0 + rows as f32);
    }

    /// Full window rectangle.
    #[must_use]
    pub fn window_rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Title bar rectangle (excludes the close button when closeable).
    #[must_use]
    pub fn title_bar_rect(&self) -> Rect {
        let width = if self.closeable {
            self.size.x - self.cell
        } else {
            self.size.x
        };
        Rect::new(self.pos.x, self.pos.y, width, self.cell)
    }

    /// Close button rectangle; empty when not closeable.
    #[must_use]
    pub fn close_button_rect(&self) -> Rect {
        if !self.closeable {
            return Rect::default();
        }
        Rect::new(self.pos.x + self.size.x - self.cell, self.pos.y, self.cell, self.cell)
    }

    /// Content rectangle below the title bar.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y + self.cell,
            self.size.x,
            self.size.y - self.cell,
        )
    }

    /// Close the window. It stays in memory.
    pub fn close(&mut self) {
        self.closed = true;
        self.dragged = false;
    }

    /// Reopen the window, optionally starting a drag immediately
    /// (used when tearing a folder row off into its own window).
    pub fn open(&mut self, start_dragging: bool) {
        self.closed = false;
        if start_dragging {
            self.dragged = true;
        }
    }

    /// Ease the position back toward the screen, keeping at least the
    /// title bar visible. Called once per frame; the lerp makes the
    /// correction visible over a few frames rather than a jump.
    pub fn constrain_to_screen(&mut self, screen_w: f32, screen_h: f32) {
        let right_edge = screen_w - self.size.x - 1.0;
        let bottom_edge = screen_h - self.size.y - 1.0;
        if self.pos.x < 0.0 {
            self.pos.x = lerp(self.pos.x, 0.0, CONSTRAIN_LERP);
        }
        if self.pos.y < 0.0 {
            self.pos.y = lerp(self.pos.y, 0.0, CONSTRAIN_LERP);
        }
        if self.pos.x > right_edge && right_edge > 0.0 {
            self.pos.x = lerp(self.pos.x, right_edge, CONSTRAIN_LERP);
        }
        if self.pos.y > bottom_edge && bottom_edge > 0.0 {
            self.pos.y = lerp(self.pos.y, bottom_edge, CONSTRAIN_LERP);
        }
    }

    /// React to one pointer event delivered to this window.
    ///
    /// Press inside the window consumes it and requests focus; press
    /// inside the title bar additionally starts a drag. Drags move by
    /// the raw pointer delta. Release over the close button closes;
    /// any release ends an active drag.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerResponse {
        if self.closed {
            return PointerResponse::default();
        }
        match event.kind {
            PointerEventKind::Press => self.handle_press(event),
            PointerEventKind::Drag => self.handle_drag(event),
            PointerEventKind::Release => self.handle_release(event),
            _ => PointerResponse::default(),
        }
    }

    fn handle_press(&mut self, event: &PointerEvent) -> PointerResponse {
        let mut response = PointerResponse::default();
        if self.window_rect().contains(event.pos.x, event.pos.y) {
            response.wants_focus = true;
            response = response.consume();
        }
        if self.title_bar_rect().contains(event.pos.x, event.pos.y) {
            self.dragged = true;
        }
        response
    }

    fn handle_drag(&mut self, event: &PointerEvent) -> PointerResponse {
        if !self.dragged {
            return PointerResponse::default();
        }
        let delta = event.delta();
        self.pos = self.pos.add(delta);
        PointerResponse::default().consume()
    }

    fn handle_release(&mut self, event: &PointerEvent) -> PointerResponse {
        let mut response = PointerResponse::default();
        if self.closeable && self.close_button_rect().contains(event.pos.x, event.pos.y) {
            self.close();
            response.closed_now = true;
            response = response.consume();
        } else if self.dragged {
            response.drag_ended = true;
            response = response.consume();
        }
        self.dragged = false;
        response
    }
}
