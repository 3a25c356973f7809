#![forbid(unsafe_code)]

//! Shared primitives for the TWK overlay GUI.
//!
//! This crate holds the leaf types every other TWK crate builds on:
//! screen-space geometry ([`geometry`]) and canonical input events
//! ([`event`]). It deliberately knows nothing about nodes, windows, or
//! persistence.

pub mod event;
pub mod geometry;

pub use event::{
    EventOutcome, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerEventKind,
};
pub use geometry::{Rect, Vec2};
