#![forbid(unsafe_code)]

//! Floating window management for the TWK overlay.
//!
//! Each window is a draggable, closeable viewport bound to one folder
//! node by path. The manager owns the set of windows and their z-order
//! (front = most recently focused) and routes pointer presses to
//! exactly one window, front to back.

pub mod manager;
pub mod snap;
pub mod window;

pub use manager::WindowManager;
pub use snap::GridSnap;
pub use window::{PointerResponse, Window, WindowId};
