// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test support: a recording [`Surface`] implementation.
//!
//! [`TraceSurface`] answers the engine's queries from plain configurable
//! fields and records every mutation in order, so tests (and demos) can assert
//! on the exact adapter traffic an interaction produced. Nothing here touches
//! a real platform.

use kurbo::{Rect, Vec2};
use smallvec::SmallVec;

use crate::surface::{CssClass, CssVar, EventType, Surface, VarValue};

bitflags::bitflags! {
    /// Set of handler registrations a [`TraceSurface`] has seen.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EventSet: u16 {
        /// `mousedown` on the surface.
        const MOUSE_DOWN = 1 << 0;
        /// `touchstart` on the surface.
        const TOUCH_START = 1 << 1;
        /// `pointerdown` on the surface.
        const POINTER_DOWN = 1 << 2;
        /// `keydown` on the surface.
        const KEY_DOWN = 1 << 3;
        /// `keyup` on the surface.
        const KEY_UP = 1 << 4;
        /// `mouseup`, document level.
        const MOUSE_UP = 1 << 5;
        /// `touchend`, document level.
        const TOUCH_END = 1 << 6;
        /// `pointerup`, document level.
        const POINTER_UP = 1 << 7;
        /// `contextmenu`, document level.
        const CONTEXT_MENU = 1 << 8;
        /// `focus` on the surface.
        const FOCUS = 1 << 9;
        /// `blur` on the surface.
        const BLUR = 1 << 10;
        /// Viewport resize notifications.
        const RESIZE = 1 << 11;
    }
}

impl From<EventType> for EventSet {
    fn from(ty: EventType) -> Self {
        match ty {
            EventType::MouseDown => Self::MOUSE_DOWN,
            EventType::TouchStart => Self::TOUCH_START,
            EventType::PointerDown => Self::POINTER_DOWN,
            EventType::KeyDown => Self::KEY_DOWN,
            EventType::KeyUp => Self::KEY_UP,
            EventType::MouseUp => Self::MOUSE_UP,
            EventType::TouchEnd => Self::TOUCH_END,
            EventType::PointerUp => Self::POINTER_UP,
            EventType::ContextMenu => Self::CONTEXT_MENU,
            EventType::Focus => Self::FOCUS,
            EventType::Blur => Self::BLUR,
        }
    }
}

/// One recorded adapter mutation, in call order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// A class was added.
    AddClass(CssClass),
    /// A class was removed.
    RemoveClass(CssClass),
    /// A custom property was written (`Some`) or cleared (`None`).
    SetVar(CssVar, Option<VarValue>),
    /// The bounding rect was measured — the engine's forcing read.
    ForcedRead,
}

/// A recording, fully configurable [`Surface`].
///
/// Queries are answered from the `set_*` fields; every mutation lands in the
/// ordered op log. By default the surface supports custom properties, is
/// bounded, enabled, not active, and reports that it contains every event
/// target (the common single-surface case; see
/// [`TraceSurface::set_contains_all`] for nested-surface scenarios).
#[derive(Clone, Debug)]
pub struct TraceSurface<K> {
    rect: Rect,
    page_offset: Vec2,
    css_support: bool,
    unbounded: bool,
    disabled: bool,
    active: bool,
    contains_all: bool,
    contained: Vec<K>,
    classes: SmallVec<[CssClass; 5]>,
    vars: SmallVec<[(CssVar, Option<VarValue>); 6]>,
    ops: Vec<SurfaceOp>,
    registered: EventSet,
    doc_registered: EventSet,
}

impl<K: Clone + PartialEq> TraceSurface<K> {
    /// Create a surface whose bounding rect is `rect`, with default state.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            page_offset: Vec2::ZERO,
            css_support: true,
            unbounded: false,
            disabled: false,
            active: false,
            contains_all: true,
            contained: Vec::new(),
            classes: SmallVec::new(),
            vars: SmallVec::new(),
            ops: Vec::new(),
            registered: EventSet::empty(),
            doc_registered: EventSet::empty(),
        }
    }

    /// Change the rect later measurements will report.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Change the reported window scroll offset.
    pub fn set_page_offset(&mut self, offset: Vec2) {
        self.page_offset = offset;
    }

    /// Toggle reported custom-property support.
    pub fn set_css_support(&mut self, supported: bool) {
        self.css_support = supported;
    }

    /// Toggle reported unbounded geometry.
    pub fn set_unbounded(&mut self, unbounded: bool) {
        self.unbounded = unbounded;
    }

    /// Toggle the reported disabled state.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Toggle the reported native `:active`-equivalent state.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// When `false`, only targets added via [`TraceSurface::add_contained`]
    /// count as contained; defaults to `true` (everything is contained).
    pub fn set_contains_all(&mut self, contains_all: bool) {
        self.contains_all = contains_all;
    }

    /// Mark a specific target as contained within this surface.
    pub fn add_contained(&mut self, target: K) {
        self.contained.push(target);
    }

    /// The ordered mutation log.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Whether `class` is currently applied.
    pub fn has_class(&self, class: CssClass) -> bool {
        self.classes.contains(&class)
    }

    /// Latest value written for `var`; `None` if never written or cleared.
    pub fn var(&self, var: CssVar) -> Option<VarValue> {
        self.vars
            .iter()
            .find(|(v, _)| *v == var)
            .and_then(|(_, value)| *value)
    }

    /// How many times `class` has been added.
    pub fn add_count(&self, class: CssClass) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == SurfaceOp::AddClass(class))
            .count()
    }

    /// How many times `class` has been removed.
    pub fn remove_count(&self, class: CssClass) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == SurfaceOp::RemoveClass(class))
            .count()
    }

    /// Handlers currently registered on the surface element.
    pub fn registered(&self) -> EventSet {
        self.registered
    }

    /// Handlers currently registered at the document level.
    pub fn registered_on_document(&self) -> EventSet {
        self.doc_registered
    }

    fn upsert_var(&mut self, var: CssVar, value: Option<VarValue>) {
        if let Some(entry) = self.vars.iter_mut().find(|(v, _)| *v == var) {
            entry.1 = value;
        } else {
            self.vars.push((var, value));
        }
    }
}

impl<K: Clone + PartialEq> Surface for TraceSurface<K> {
    type Target = K;

    fn browser_supports_css_vars(&self) -> bool {
        self.css_support
    }

    fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    fn is_surface_active(&self) -> bool {
        self.active
    }

    fn is_surface_disabled(&self) -> bool {
        self.disabled
    }

    fn add_class(&mut self, class: CssClass) {
        self.ops.push(SurfaceOp::AddClass(class));
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    fn remove_class(&mut self, class: CssClass) {
        self.ops.push(SurfaceOp::RemoveClass(class));
        self.classes.retain(|c| *c != class);
    }

    fn contains_event_target(&self, target: &K) -> bool {
        self.contains_all || self.contained.contains(target)
    }

    fn register_interaction_handler(&mut self, event: EventType) {
        self.registered |= EventSet::from(event);
    }

    fn deregister_interaction_handler(&mut self, event: EventType) {
        self.registered &= !EventSet::from(event);
    }

    fn register_document_interaction_handler(&mut self, event: EventType) {
        self.doc_registered |= EventSet::from(event);
    }

    fn deregister_document_interaction_handler(&mut self, event: EventType) {
        self.doc_registered &= !EventSet::from(event);
    }

    fn register_resize_handler(&mut self) {
        self.registered |= EventSet::RESIZE;
    }

    fn deregister_resize_handler(&mut self) {
        self.registered &= !EventSet::RESIZE;
    }

    fn update_css_variable(&mut self, var: CssVar, value: Option<VarValue>) {
        self.ops.push(SurfaceOp::SetVar(var, value));
        self.upsert_var(var, value);
    }

    fn compute_bounding_rect(&mut self) -> Rect {
        self.ops.push(SurfaceOp::ForcedRead);
        self.rect
    }

    fn window_page_offset(&self) -> Vec2 {
        self.page_offset
    }
}
