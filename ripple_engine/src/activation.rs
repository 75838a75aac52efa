// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activation events and per-interaction bookkeeping.

use kurbo::Point;

/// The event family that triggered an activation.
///
/// Pointer-family kinds carry a press position and animate from the press
/// point; keyboard activation animates from the surface center and is
/// conditional on the surface actually entering its native active state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// `mousedown`.
    MouseDown,
    /// `touchstart`.
    TouchStart,
    /// `pointerdown`.
    PointerDown,
    /// `keydown`.
    KeyDown,
}

impl EventKind {
    /// True for the mouse/touch/pointer family, false for keyboard.
    pub fn is_pointer(self) -> bool {
        !matches!(self, Self::KeyDown)
    }
}

/// A DOM activation event, reduced to what the engine needs.
///
/// `K` is the host's event-target identity type (see
/// [`Surface::Target`](crate::Surface::Target)).
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationEvent<K> {
    /// Which event family fired.
    pub kind: EventKind,
    /// The event's target, retained for the nested-activation guard.
    pub target: K,
    /// Page-coordinate press position; `None` for keyboard events. For touch
    /// events this is the first changed touch point.
    pub page_point: Option<Point>,
    /// Whether a keyboard event was the space key, which needs an extra
    /// active-state retry on some platforms.
    pub space_key: bool,
}

impl<K> ActivationEvent<K> {
    /// A `mousedown` at `page_point`.
    pub fn mouse_down(target: K, page_point: Point) -> Self {
        Self {
            kind: EventKind::MouseDown,
            target,
            page_point: Some(page_point),
            space_key: false,
        }
    }

    /// A `touchstart` whose first changed touch is at `page_point`.
    pub fn touch_start(target: K, page_point: Point) -> Self {
        Self {
            kind: EventKind::TouchStart,
            target,
            page_point: Some(page_point),
            space_key: false,
        }
    }

    /// A `pointerdown` at `page_point`.
    pub fn pointer_down(target: K, page_point: Point) -> Self {
        Self {
            kind: EventKind::PointerDown,
            target,
            page_point: Some(page_point),
            space_key: false,
        }
    }

    /// A `keydown`; `space_key` marks the space bar.
    pub fn key_down(target: K, space_key: bool) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            page_point: None,
            space_key,
        }
    }
}

/// Mutable bookkeeping for the in-flight interaction, owned exclusively by one
/// engine instance and reset to defaults between interactions.
#[derive(Clone, Debug)]
pub(crate) struct ActivationState<K> {
    /// True between a recognized activation and its resolved deactivation.
    pub(crate) is_activated: bool,
    /// True if activation came from a direct API call, not a DOM event.
    pub(crate) is_programmatic: bool,
    /// The triggering event, retained to compute geometry after the fact.
    pub(crate) activation_event: Option<ActivationEvent<K>>,
    /// True iff the triggering event was pointer-family.
    pub(crate) was_activated_by_pointer: bool,
    /// Whether the surface actually entered its `:active`-equivalent state.
    pub(crate) was_element_made_active: bool,
    /// Guards the deactivation visual sequence from running twice.
    pub(crate) has_deactivation_ux_run: bool,
}

// Manual impl: the derive would demand `K: Default` for no reason.
impl<K> Default for ActivationState<K> {
    fn default() -> Self {
        Self {
            is_activated: false,
            is_programmatic: false,
            activation_event: None,
            was_activated_by_pointer: false,
            was_element_made_active: false,
            has_deactivation_ux_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_family_classification() {
        assert!(EventKind::MouseDown.is_pointer());
        assert!(EventKind::TouchStart.is_pointer());
        assert!(EventKind::PointerDown.is_pointer());
        assert!(!EventKind::KeyDown.is_pointer());
    }

    #[test]
    fn constructors_fill_the_expected_fields() {
        let ev = ActivationEvent::touch_start(7_u32, Point::new(3.0, 4.0));
        assert_eq!(ev.kind, EventKind::TouchStart);
        assert_eq!(ev.page_point, Some(Point::new(3.0, 4.0)));
        assert!(!ev.space_key);

        let key = ActivationEvent::key_down(7_u32, true);
        assert_eq!(key.kind, EventKind::KeyDown);
        assert_eq!(key.page_point, None);
        assert!(key.space_key);
    }
}
