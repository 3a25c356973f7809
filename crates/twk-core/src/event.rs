#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host translates its native events (winit, SDL, whatever drives
//! its main loop) into these types and feeds them to the dispatcher
//! once per raw event. All events derive `Clone` and `PartialEq` for
//! use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are f32 screen pixels, origin top-left.
//! - Pointer events carry both the current and the previous position;
//!   the dispatcher fills in the previous one from its own memory so
//!   subscribers get drag deltas even when the host only reports the
//!   current position.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Vec2;

/// Result of offering an event to a subscriber.
///
/// `Consumed` stops propagation: no later subscriber sees the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The subscriber did not handle the event; keep propagating.
    Ignored,
    /// The subscriber handled the event exclusively.
    Consumed,
}

impl EventOutcome {
    /// Check whether the event was consumed.
    #[inline]
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE = 0;
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key.
        const CTRL = 1 << 1;
        /// Alt/Option key.
        const ALT = 1 << 2;
        /// Super/Meta/Cmd key.
        const SUPER = 1 << 3;
    }
}

/// Key codes for keyboard events.
///
/// Only the keys the overlay reacts to are enumerated; everything else
/// arrives as `Char` or `Other` and passes through to widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character key.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// An unmapped key with the host's raw code.
    Other(u32),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed or released.
    pub code: KeyCode,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key, ignoring case.
    #[must_use]
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
    }

    /// Check if the platform primary modifier (Ctrl or Cmd) is held.
    #[must_use]
    pub const fn primary_modifier(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL) || self.modifiers.contains(Modifiers::SUPER)
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left / primary button.
    #[default]
    Left,
    /// Right / secondary button.
    Right,
    /// Middle button.
    Middle,
}

/// What a pointer event reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    /// A button was pressed.
    Press,
    /// A button was released.
    Release,
    /// The pointer moved with no button held.
    Move,
    /// The pointer moved with a button held.
    Drag,
    /// The wheel scrolled; positive is away from the user.
    Wheel(f32),
}

/// A pointer event as delivered to subscribers.
///
/// `prev` is the position of the previous pointer event, maintained by
/// the dispatcher; on the very first event it equals `pos`, so drag
/// deltas start at zero instead of jumping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Current pointer position.
    pub pos: Vec2,
    /// Position at the previous pointer event.
    pub prev: Vec2,
    /// The button involved (meaningful for press/release/drag).
    pub button: PointerButton,
}

impl PointerEvent {
    /// Movement since the previous pointer event.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.pos.sub(self.prev)
    }
}
