#![forbid(unsafe_code)]

//! The painter seam between the overlay and the host renderer.
//!
//! The overlay computes geometry and hands the host fully resolved
//! draw data; pixel work (rectangles, text layout, shader backgrounds)
//! stays on the host side. [`Gui::draw`](crate::Gui::draw) calls the
//! painter back to front, chrome first, then each visible row.

use twk_core::Rect;

/// Receives resolved draw data once per frame.
pub trait GuiPainter {
    /// Draw one window's frame, title bar, and close button.
    fn window_chrome(&mut self, chrome: &WindowChrome<'_>);

    /// Draw one content row inside the most recently drawn window.
    fn row(&mut self, row: &RowInfo<'_>);
}

/// Geometry and labeling for one window's chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowChrome<'a> {
    /// Full window rectangle.
    pub rect: Rect,
    /// Title bar rectangle (close button excluded).
    pub title_bar: Rect,
    /// Close button rectangle; empty for the root window.
    pub close_button: Rect,
    /// Display name of the bound folder.
    pub title: &'a str,
    /// Full path segments of the bound folder, for hover tooltips.
    pub path_segments: Vec<&'a str>,
    /// Whether this window is at the front of the z-order.
    pub focused: bool,
}

/// One content row: geometry, identity, and the widget to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RowInfo<'a> {
    /// Row rectangle in screen space.
    pub rect: Rect,
    /// Absolute path of the node.
    pub path: &'a str,
    /// Display name (last path segment).
    pub name: &'a str,
    /// Whether the pointer is over this row.
    pub hovered: bool,
    /// Whether this row is being dragged (slider rows only).
    pub dragged: bool,
    /// The widget and its current value.
    pub widget: RowWidget<'a>,
}

/// Per-kind render data for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowWidget<'a> {
    /// A folder row; clicking it opens the folder's window.
    Folder {
        /// Whether the folder's window is currently open.
        open: bool,
    },
    /// A float slider.
    Slider {
        /// Current value.
        value: f32,
        /// Active precision step, for the value readout.
        step: f32,
    },
    /// A 2D vector readout.
    Vector2 {
        /// X component.
        x: f32,
        /// Y component.
        y: f32,
        /// Active precision step, for the value readout.
        step: f32,
    },
    /// A boolean toggle.
    Toggle {
        /// Current value.
        checked: bool,
    },
    /// A one-of-N picker showing its selected option.
    Radio {
        /// Currently selected option text.
        selected: &'a str,
    },
    /// A color swatch.
    Color {
        /// Packed 0xAARRGGBB value.
        hex: u32,
    },
    /// A read-only text row.
    Text {
        /// Current content.
        value: &'a str,
    },
    /// A host-drawn preview row; the host matches on `path`.
    Preview,
}
