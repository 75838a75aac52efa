// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface adapter seam.
//!
//! The engine never touches a real element. Every observation (geometry,
//! active/disabled state, custom-property support) and every mutation (class
//! toggles, variable writes, listener churn) crosses the [`Surface`] trait,
//! implemented once per concrete widget by the host.
//!
//! All methods are required. A silently defaulted no-op adapter method masks
//! integration bugs, so there are no provided defaults here; hosts that
//! genuinely do not care about a method implement it as an explicit no-op at
//! their own call site.
//!
//! Listener registration is modeled as typed [`EventType`] subscriptions. The
//! handler is always the engine itself: when a subscribed event fires, the
//! host forwards it to the matching engine entry point
//! ([`activate`](crate::RippleEngine::activate),
//! [`deactivate`](crate::RippleEngine::deactivate),
//! [`handle_focus`](crate::RippleEngine::handle_focus),
//! [`handle_blur`](crate::RippleEngine::handle_blur), or
//! [`layout`](crate::RippleEngine::layout) for resize).

use kurbo::{Rect, Vec2};

/// Event families the engine subscribes to through a [`Surface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Primary mouse button pressed on the surface.
    MouseDown,
    /// Touch began on the surface.
    TouchStart,
    /// Unified pointer pressed on the surface.
    PointerDown,
    /// Key pressed while the surface has focus.
    KeyDown,
    /// Key released; the keyboard-press release signal.
    KeyUp,
    /// Mouse button released, possibly off-surface.
    MouseUp,
    /// Touch ended, possibly off-surface.
    TouchEnd,
    /// Unified pointer released, possibly off-surface.
    PointerUp,
    /// Context menu summoned mid-press; treated as a release.
    ContextMenu,
    /// Surface gained keyboard focus.
    Focus,
    /// Surface lost keyboard focus.
    Blur,
}

impl EventType {
    /// The DOM event name a host would subscribe to.
    pub fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::TouchStart => "touchstart",
            Self::PointerDown => "pointerdown",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::MouseUp => "mouseup",
            Self::TouchEnd => "touchend",
            Self::PointerUp => "pointerup",
            Self::ContextMenu => "contextmenu",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

/// Events that begin an interaction; subscribed on the surface at init.
pub const ACTIVATION_EVENT_TYPES: [EventType; 4] = [
    EventType::TouchStart,
    EventType::PointerDown,
    EventType::MouseDown,
    EventType::KeyDown,
];

/// Events that end a pointer interaction; subscribed on the *document* while a
/// pointer press is live, since release may happen outside the surface bounds.
pub const POINTER_RELEASE_EVENT_TYPES: [EventType; 4] = [
    EventType::TouchEnd,
    EventType::PointerUp,
    EventType::MouseUp,
    EventType::ContextMenu,
];

/// CSS classes the engine toggles on the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CssClass {
    /// Marks a surface whose ripple has been upgraded and initialized.
    Root,
    /// Marks an unbounded (square, centered) ripple surface.
    Unbounded,
    /// Background tint shown while the surface has keyboard focus.
    BgFocused,
    /// Runs the foreground growth animation.
    FgActivation,
    /// Runs the foreground fade-out animation.
    FgDeactivation,
}

impl CssClass {
    /// Every class the engine may apply.
    pub const ALL: [Self; 5] = [
        Self::Root,
        Self::Unbounded,
        Self::BgFocused,
        Self::FgActivation,
        Self::FgDeactivation,
    ];

    /// Stable class name as written into the host stylesheet.
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "ripple-upgraded",
            Self::Unbounded => "ripple-upgraded--unbounded",
            Self::BgFocused => "ripple-upgraded--background-focused",
            Self::FgActivation => "ripple-upgraded--foreground-activation",
            Self::FgDeactivation => "ripple-upgraded--foreground-deactivation",
        }
    }
}

/// CSS custom properties the engine publishes.
///
/// The host stylesheet consumes these to size, place, and scale the two ripple
/// layers; the engine only ever writes them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CssVar {
    /// Starting diameter of the foreground circle.
    FgSize,
    /// Scale factor growing the foreground circle to cover the surface.
    FgScale,
    /// Foreground translation at animation start (bounded surfaces only).
    FgTranslateStart,
    /// Foreground translation at animation end (bounded surfaces only).
    FgTranslateEnd,
    /// Horizontal centering offset (unbounded surfaces only).
    Left,
    /// Vertical centering offset (unbounded surfaces only).
    Top,
}

impl CssVar {
    /// Every variable the engine may publish; destroy clears them all.
    pub const ALL: [Self; 6] = [
        Self::FgSize,
        Self::FgScale,
        Self::FgTranslateStart,
        Self::FgTranslateEnd,
        Self::Left,
        Self::Top,
    ];

    /// Stable custom-property name as consumed by the host stylesheet.
    pub fn name(self) -> &'static str {
        match self {
            Self::FgSize => "--ripple-fg-size",
            Self::FgScale => "--ripple-fg-scale",
            Self::FgTranslateStart => "--ripple-fg-translate-start",
            Self::FgTranslateEnd => "--ripple-fg-translate-end",
            Self::Left => "--ripple-left",
            Self::Top => "--ripple-top",
        }
    }
}

/// Typed value for a CSS custom property.
///
/// `Display` renders the exact CSS text a host would assign.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VarValue {
    /// A pixel length, e.g. `60px`.
    Px(f64),
    /// A unitless number, e.g. a scale factor.
    Number(f64),
    /// A pair of pixel lengths, e.g. a `translate()` argument `10px, 20px`.
    PxPair {
        /// Horizontal component.
        x: f64,
        /// Vertical component.
        y: f64,
    },
}

impl core::fmt::Display for VarValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Number(v) => write!(f, "{v}"),
            Self::PxPair { x, y } => write!(f, "{x}px, {y}px"),
        }
    }
}

/// Host-implemented adapter binding one engine instance to one visual surface.
///
/// All calls are synchronous and must not fail; a zero-sized
/// [`Surface::compute_bounding_rect`] result is a valid degenerate answer, not
/// an error.
pub trait Surface {
    /// Identity of an event target, used for the ancestor/descendant
    /// double-activation guard. Typically a node id or element handle.
    type Target: Clone + PartialEq;

    /// Whether the platform supports the CSS custom properties the animation
    /// depends on. Queried lazily at init time, once per `init` call.
    fn browser_supports_css_vars(&self) -> bool;

    /// Whether this surface uses unbounded (centered, clip-free) geometry.
    ///
    /// This is the single source of truth for the geometry formulas; keep it
    /// consistent with [`crate::RippleEngine::set_unbounded`] calls.
    fn is_unbounded(&self) -> bool;

    /// Live query of the surface's native `:active`-equivalent state. Only
    /// consulted to confirm keyboard activation.
    fn is_surface_active(&self) -> bool;

    /// Whether the surface refuses interaction entirely.
    fn is_surface_disabled(&self) -> bool;

    /// Add a class to the surface element.
    fn add_class(&mut self, class: CssClass);

    /// Remove a class from the surface element.
    fn remove_class(&mut self, class: CssClass);

    /// Whether `target` is this surface or one of its descendants.
    fn contains_event_target(&self, target: &Self::Target) -> bool;

    /// Subscribe to `event` on the surface element.
    fn register_interaction_handler(&mut self, event: EventType);

    /// Unsubscribe from `event` on the surface element.
    fn deregister_interaction_handler(&mut self, event: EventType);

    /// Subscribe to `event` at the document level.
    fn register_document_interaction_handler(&mut self, event: EventType);

    /// Unsubscribe from `event` at the document level.
    fn deregister_document_interaction_handler(&mut self, event: EventType);

    /// Subscribe to viewport resize notifications.
    fn register_resize_handler(&mut self);

    /// Unsubscribe from viewport resize notifications.
    fn deregister_resize_handler(&mut self);

    /// Write (`Some`) or clear (`None`) a custom property on the surface.
    fn update_css_variable(&mut self, var: CssVar, value: Option<VarValue>);

    /// Measure the surface's bounding rectangle, in viewport coordinates.
    ///
    /// Takes `&mut self` because in a real host this is a forcing read: the
    /// engine also calls it between a class strip and re-add purely so the
    /// strip is applied before the new class lands.
    fn compute_bounding_rect(&mut self) -> Rect;

    /// Current window scroll offset, used to normalize page-coordinate press
    /// positions into surface-relative ones.
    fn window_page_offset(&self) -> Vec2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_values_render_as_css_text() {
        assert_eq!(VarValue::Px(60.0).to_string(), "60px");
        assert_eq!(VarValue::Px(117.5).to_string(), "117.5px");
        assert_eq!(VarValue::Number(1.9467).to_string(), "1.9467");
        assert_eq!(VarValue::PxPair { x: 10.0, y: -20.0 }.to_string(), "10px, -20px");
    }

    #[test]
    fn class_and_var_names_are_distinct() {
        for (i, a) in CssClass::ALL.iter().enumerate() {
            for b in &CssClass::ALL[i + 1..] {
                assert_ne!(a.name(), b.name(), "duplicate class name");
            }
        }
        for (i, a) in CssVar::ALL.iter().enumerate() {
            for b in &CssVar::ALL[i + 1..] {
                assert_ne!(a.name(), b.name(), "duplicate variable name");
            }
        }
    }

    #[test]
    fn release_set_covers_the_pointer_family_plus_contextmenu() {
        assert!(POINTER_RELEASE_EVENT_TYPES.contains(&EventType::ContextMenu));
        assert!(!POINTER_RELEASE_EVENT_TYPES.contains(&EventType::KeyUp));
    }
}
