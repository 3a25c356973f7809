#![forbid(unsafe_code)]

//! Grid snapping policy.
//!
//! Snapping is a pure geometric post-process applied when a window is
//! dropped (and to all static windows when the mode or cell size
//! changes); it never leaks into per-frame drag math, so a window
//! follows the pointer freely while dragged.

use twk_core::Vec2;

/// Global grid-snap mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    /// Whether drop positions snap to the grid.
    pub enabled: bool,
    /// Grid cell size in pixels.
    pub cell: f32,
}

impl GridSnap {
    /// Create a snap policy. A non-positive cell disables snapping.
    #[must_use]
    pub fn new(enabled: bool, cell: f32) -> Self {
        Self { enabled, cell }
    }

    /// Round a position to the nearest multiple of the cell size.
    ///
    /// Identity when disabled. Snapping an already-snapped position is
    /// a no-op.
    #[must_use]
    pub fn snap(&self, pos: Vec2) -> Vec2 {
        if !self.enabled || self.cell <= 0.0 {
            return pos;
        }
        Vec2::new(self.snap_axis(pos.x), self.snap_axis(pos.y))
    }

    fn snap_axis(&self, v: f32) -> f32 {
        (v / self.cell).round() * self.cell
    }
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: false,
            cell: 24.0,
        }
    }
}
