#![forbid(unsafe_code)]

//! Input dispatch: ordered subscribers, consumption, fell-through.
//!
//! The host feeds one raw event per call into [`InputDispatcher`],
//! which offers it to subscribers most-recently-focused first until
//! one consumes it. Consumption stops propagation, so at most one
//! subscriber observes an event's exclusive side effects (drag-start,
//! focus take-over).
//!
//! Subscribers are opaque [`SubscriberId`]s; actual delivery happens
//! through a caller-supplied closure. This keeps the dispatcher free
//! of references into the window manager while it is being mutated by
//! the very events it routes.
//!
//! Two reserved shortcuts, primary-modifier+Z (undo) and
//! primary-modifier+Y (redo), are intercepted before any subscriber
//! sees the key and always consume it, regardless of focus.

use tracing::trace;
use twk_core::{
    EventOutcome, KeyCode, KeyEvent, PointerButton, PointerEvent, PointerEventKind, Vec2,
};

/// Opaque identity of an input subscriber (a window, or the global
/// overlay handler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// The reserved global shortcuts intercepted ahead of all subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalShortcut {
    /// Primary modifier + Z.
    Undo,
    /// Primary modifier + Y.
    Redo,
}

/// Result of publishing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDispatch {
    /// A reserved shortcut matched; the event was consumed before any
    /// subscriber saw it.
    Intercepted(GlobalShortcut),
    /// The event was offered to subscribers; `consumed` tells whether
    /// one of them took it.
    Delivered {
        /// Whether any subscriber consumed the event.
        consumed: bool,
    },
}

/// Routes raw host input to exactly one consuming subscriber.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    /// Most recently focused first. New subscribers register at the
    /// front, matching "newest window gets first pick".
    order: Vec<SubscriberId>,
    /// Position at the previous pointer event, if any.
    prev: Option<Vec2>,
    /// Whether the last pointer press was consumed by nobody.
    fell_through: bool,
}

impl InputDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber at the front of the order.
    ///
    /// Re-registering an existing id just moves it to the front.
    pub fn subscribe(&mut self, id: SubscriberId) {
        self.order.retain(|s| *s != id);
        self.order.insert(0, id);
    }

    /// Move an existing subscriber to the front of the order.
    ///
    /// Unknown ids are registered fresh; focus and registration use
    /// the same front-of-list rule.
    pub fn set_focus(&mut self, id: SubscriberId) {
        self.subscribe(id);
    }

    /// Current delivery order, most recently focused first.
    #[must_use]
    pub fn order(&self) -> &[SubscriberId] {
        &self.order
    }

    /// Whether the most recent pointer press was consumed by no
    /// subscriber. The host may use this for its own canvas picking.
    #[must_use]
    pub fn mouse_fell_through(&self) -> bool {
        self.fell_through
    }

    /// Publish one raw pointer event.
    ///
    /// The previous pointer position is filled in from dispatcher
    /// memory (on the very first event it equals the current one).
    /// `deliver` is called per subscriber in order until it returns
    /// [`EventOutcome::Consumed`]. Returns whether the event was
    /// consumed.
    ///
    /// The order is snapshotted before delivery: a subscriber taking
    /// focus mid-event reorders future events, never the current one.
    pub fn publish_pointer(
        &mut self,
        kind: PointerEventKind,
        pos: Vec2,
        button: PointerButton,
        mut deliver: impl FnMut(SubscriberId, &PointerEvent) -> EventOutcome,
    ) -> bool {
        let prev = self.prev.unwrap_or(pos);
        let event = PointerEvent {
            kind,
            pos,
            prev,
            button,
        };
        let snapshot: Vec<SubscriberId> = self.order.clone();
        let mut consumed = false;
        for id in snapshot {
            if deliver(id, &event).is_consumed() {
                trace!(?id, ?kind, "pointer event consumed");
                consumed = true;
                break;
            }
        }
        // Fell-through is press state only; moves and releases between
        // presses must not rewrite it.
        if matches!(kind, PointerEventKind::Press) {
            self.fell_through = !consumed;
        }
        self.prev = Some(pos);
        consumed
    }

    /// Publish one raw key event.
    ///
    /// Reserved undo/redo shortcuts are matched first and reported as
    /// [`KeyDispatch::Intercepted`] without any subscriber seeing the
    /// event.
    pub fn publish_key(
        &mut self,
        event: KeyEvent,
        mut deliver: impl FnMut(SubscriberId, &KeyEvent) -> EventOutcome,
    ) -> KeyDispatch {
        if let Some(shortcut) = Self::match_global_shortcut(&event) {
            trace!(?shortcut, "global shortcut intercepted");
            return KeyDispatch::Intercepted(shortcut);
        }
        let snapshot: Vec<SubscriberId> = self.order.clone();
        for id in snapshot {
            if deliver(id, &event).is_consumed() {
                return KeyDispatch::Delivered { consumed: true };
            }
        }
        KeyDispatch::Delivered { consumed: false }
    }

    fn match_global_shortcut(event: &KeyEvent) -> Option<GlobalShortcut> {
        if !event.primary_modifier() {
            return None;
        }
        match event.code {
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'z') => Some(GlobalShortcut::Undo),
            KeyCode::Char(c) if c.eq_ignore_ascii_case(&'y') => Some(GlobalShortcut::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twk_core::Modifiers;

    fn press_at(d: &mut InputDispatcher, x: f32, y: f32, sink: &mut Vec<SubscriberId>) -> bool {
        d.publish_pointer(
            PointerEventKind::Press,
            Vec2::new(x, y),
            PointerButton::Left,
            |id, _| {
                sink.push(id);
                EventOutcome::Ignored
            },
        )
    }

    #[test]
    fn new_subscribers_register_at_front() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        d.subscribe(SubscriberId(2));
        assert_eq!(d.order(), &[SubscriberId(2), SubscriberId(1)]);
    }

    #[test]
    fn set_focus_moves_to_front() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        d.subscribe(SubscriberId(2));
        d.set_focus(SubscriberId(1));
        assert_eq!(d.order(), &[SubscriberId(1), SubscriberId(2)]);
    }

    #[test]
    fn consumption_short_circuits() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        d.subscribe(SubscriberId(2));
        let mut seen = Vec::new();
        let consumed = d.publish_pointer(
            PointerEventKind::Press,
            Vec2::ZERO,
            PointerButton::Left,
            |id, _| {
                seen.push(id);
                EventOutcome::Consumed
            },
        );
        assert!(consumed);
        // Front subscriber consumed; the one behind never saw it.
        assert_eq!(seen, vec![SubscriberId(2)]);
    }

    #[test]
    fn fell_through_tracks_unconsumed_press() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        let mut seen = Vec::new();
        assert!(!press_at(&mut d, 5.0, 5.0, &mut seen));
        assert!(d.mouse_fell_through());
        d.publish_pointer(
            PointerEventKind::Press,
            Vec2::ZERO,
            PointerButton::Left,
            |_, _| EventOutcome::Consumed,
        );
        assert!(!d.mouse_fell_through());
    }

    #[test]
    fn fell_through_holds_across_unconsumed_moves() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        d.publish_pointer(
            PointerEventKind::Press,
            Vec2::ZERO,
            PointerButton::Left,
            |_, _| EventOutcome::Consumed,
        );
        assert!(!d.mouse_fell_through());
        // Moves are routinely unconsumed; they must not rewrite the
        // press state.
        d.publish_pointer(
            PointerEventKind::Move,
            Vec2::new(500.0, 500.0),
            PointerButton::Left,
            |_, _| EventOutcome::Ignored,
        );
        assert!(!d.mouse_fell_through());
        d.publish_pointer(
            PointerEventKind::Press,
            Vec2::new(500.0, 500.0),
            PointerButton::Left,
            |_, _| EventOutcome::Ignored,
        );
        assert!(d.mouse_fell_through());
    }

    #[test]
    fn first_pointer_event_has_zero_delta() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        let mut delta = None;
        d.publish_pointer(
            PointerEventKind::Move,
            Vec2::new(40.0, 50.0),
            PointerButton::Left,
            |_, e| {
                delta = Some(e.delta());
                EventOutcome::Ignored
            },
        );
        assert_eq!(delta, Some(Vec2::ZERO));
    }

    #[test]
    fn previous_position_carries_across_events() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        let mut sink = Vec::new();
        press_at(&mut d, 10.0, 10.0, &mut sink);
        let mut prev = None;
        d.publish_pointer(
            PointerEventKind::Drag,
            Vec2::new(14.0, 13.0),
            PointerButton::Left,
            |_, e| {
                prev = Some(e.prev);
                EventOutcome::Ignored
            },
        );
        assert_eq!(prev, Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn undo_redo_intercepted_before_subscribers() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        let mut saw_any = false;
        let undo = KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL);
        let out = d.publish_key(undo, |_, _| {
            saw_any = true;
            EventOutcome::Consumed
        });
        assert_eq!(out, KeyDispatch::Intercepted(GlobalShortcut::Undo));
        assert!(!saw_any);

        let redo = KeyEvent::new(KeyCode::Char('Y')).with_modifiers(Modifiers::SUPER);
        let out = d.publish_key(redo, |_, _| EventOutcome::Ignored);
        assert_eq!(out, KeyDispatch::Intercepted(GlobalShortcut::Redo));
    }

    #[test]
    fn plain_z_is_delivered_not_intercepted() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        let z = KeyEvent::new(KeyCode::Char('z'));
        let out = d.publish_key(z, |_, _| EventOutcome::Consumed);
        assert_eq!(out, KeyDispatch::Delivered { consumed: true });
    }

    #[test]
    fn mid_event_refocus_does_not_reorder_current_delivery() {
        let mut d = InputDispatcher::new();
        d.subscribe(SubscriberId(1));
        d.subscribe(SubscriberId(2));
        // Delivery can't call set_focus on `d` directly (it is
        // borrowed); the facade applies focus after dispatch. What the
        // dispatcher guarantees is that the snapshot order holds for
        // the whole event.
        let mut seen = Vec::new();
        d.publish_pointer(
            PointerEventKind::Press,
            Vec2::ZERO,
            PointerButton::Left,
            |id, _| {
                seen.push(id);
                EventOutcome::Ignored
            },
        );
        assert_eq!(seen, vec![SubscriberId(2), SubscriberId(1)]);
    }
}
