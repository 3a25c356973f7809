#![forbid(unsafe_code)]

//! TWK: an embeddable, path-addressed debug/tweak GUI overlay.
//!
//! The host calls widget accessors every frame with a slash-delimited
//! path and gets the current value back:
//!
//! ```no_run
//! use twk::{Gui, GuiSettings};
//!
//! let mut gui = Gui::new(GuiSettings::new("my-app"))?;
//! // per frame:
//! gui.begin_frame(1920.0, 1080.0);
//! let speed = gui.slider("scene/speed", 1.0);
//! let paused = gui.toggle("scene/paused", false);
//! # Ok::<(), twk::PersistError>(())
//! ```
//!
//! State is retained in a path-addressed tree, rendered as draggable
//! floating windows (one per top-level folder, more on folder clicks),
//! saved to named json documents, and covered by whole-tree undo/redo
//! (primary modifier + Z / Y).
//!
//! Pixel drawing stays on the host: implement [`GuiPainter`] and pass
//! it to [`Gui::draw`].

pub mod gui;
pub mod paint;
pub mod settings;

pub use gui::Gui;
pub use paint::{GuiPainter, RowInfo, RowWidget, WindowChrome};
pub use settings::GuiSettings;

pub use twk_core::{
    EventOutcome, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEventKind, Rect, Vec2,
};
pub use twk_persist::{PersistError, SaveInfo};
pub use twk_tree::{TreeError, PRECISION_LADDER};

/// The types most hosts need.
pub mod prelude {
    pub use crate::{Gui, GuiPainter, GuiSettings, RowInfo, RowWidget, WindowChrome};
    pub use twk_core::{
        KeyCode, KeyEvent, Modifiers, PointerButton, PointerEventKind, Rect, Vec2,
    };
}
