// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ripple activation/deactivation state machine.
//!
//! ## Interaction cycle
//!
//! An interaction moves through five behavioral states:
//!
//! 1. **Idle** — nothing in flight.
//! 2. **Activating** — a press was recognized; whether the surface truly went
//!    active is confirmed on the next frame tick (keyboard activation queries
//!    the surface, everything else is unconditional).
//! 3. **Active** — the foreground growth animation is running or finished.
//! 4. **Deactivating** — the release arrived; the visual fade runs only once
//!    *both* the release and the growth window have completed, in either
//!    order.
//! 5. **Cooldown** — after reset, a follow-on event of a *different* kind
//!    within [`TAP_DELAY_MS`] is ignored, absorbing the synthetic mouse event
//!    touch browsers replay after a tap.
//!
//! ## Driving the engine
//!
//! The engine is host-pumped. DOM-ish events come in through
//! [`RippleEngine::activate`] / [`RippleEngine::deactivate`] /
//! [`RippleEngine::handle_focus`] / [`RippleEngine::handle_blur`] /
//! [`RippleEngine::layout`] (also the resize path); the host then calls
//! [`RippleEngine::on_frame`] each animation-frame tick and
//! [`RippleEngine::on_timers`] whenever the scheduler's clock passes a
//! deadline. With [`ManualScheduler`] the whole machine runs under a fake
//! clock.

use std::rc::Rc;

use kurbo::{Point, Rect};
use ripple_sched::{FrameHandle, ManualScheduler, Scheduler, TimerHandle};

use crate::activation::{ActivationEvent, ActivationState, EventKind};
use crate::claims::{ClaimSet, SharedClaims};
use crate::geometry;
use crate::surface::{
    ACTIVATION_EVENT_TYPES, CssClass, CssVar, EventType, POINTER_RELEASE_EVENT_TYPES, Surface,
    VarValue,
};

/// Growth-animation window: once this has elapsed after a growth start, the
/// activation animation is considered visually complete.
pub const DEACTIVATION_TIMEOUT_MS: u64 = 225;

/// How long the deactivation class is held before removal.
pub const FG_DEACTIVATION_MS: u64 = 150;

/// Cooldown window after reset during which a duplicate event of a different
/// kind from the same physical interaction is ignored.
pub const TAP_DELAY_MS: u64 = 300;

/// Snapshot of the activation taken when the release arrives, consumed by the
/// frame-deferred deactivation task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeactivationSnapshot {
    /// Whether the interaction was started by a pointer-family event.
    pub was_activated_by_pointer: bool,
    /// Whether the surface was confirmed made active.
    pub was_element_made_active: bool,
}

/// Deferred work the engine schedules on its [`Scheduler`].
///
/// Hosts never construct these; they only pick the type when naming a concrete
/// scheduler, e.g. `ManualScheduler<Task>`.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Init frame: apply the root (and unbounded) classes.
    InitClasses,
    /// Destroy frame: strip classes and clear every published variable.
    DestroyCleanup,
    /// Post-activation frame: clear shared claims, retry the space-bar
    /// active check, and reset when the element never went active.
    ActivationSettle {
        /// Whether a space-key activation is eligible for one retry.
        space_retry: bool,
    },
    /// Frame-deferred deactivation visual sequence.
    Deactivate {
        /// State captured when the release was observed.
        snapshot: DeactivationSnapshot,
        /// Whether the activation was programmatic (already reset).
        programmatic: bool,
    },
    /// Debounced layout pass.
    Layout,
    /// Frame-deferred focus tint application.
    FocusGained,
    /// Frame-deferred focus tint removal.
    FocusLost,
    /// The growth-animation window elapsed.
    GrowthComplete,
    /// The deactivation-class hold elapsed.
    FgDeactivationEnd,
    /// The post-reset duplicate-event window elapsed.
    CooldownExpired,
}

/// The ripple interaction engine: one instance per visual surface.
///
/// Coordinates event-driven activation detection, frame-deferred mutation,
/// timer-driven deactivation sequencing, and the shared per-frame claim
/// registry that suppresses nested activations.
///
/// ## Usage
///
/// ```
/// use kurbo::{Point, Rect};
/// use ripple_engine::testing::TraceSurface;
/// use ripple_engine::{ActivationEvent, CssClass, RippleEngine};
///
/// let surface: TraceSurface<u32> = TraceSurface::new(Rect::new(0.0, 0.0, 200.0, 100.0));
/// let mut engine = RippleEngine::standalone(surface);
/// engine.init();
/// engine.on_frame(); // the root class lands on the first frame tick
/// assert!(engine.surface().has_class(CssClass::Root));
///
/// engine.activate(Some(ActivationEvent::mouse_down(1, Point::new(50.0, 25.0))));
/// assert!(engine.is_activated());
/// assert!(engine.surface().has_class(CssClass::FgActivation));
///
/// engine.deactivate();
/// engine.on_frame(); // release side of the gate
/// engine.scheduler_mut().advance(225);
/// engine.on_timers(); // growth window elapses; the fade begins
/// assert!(!engine.is_activated());
/// assert!(engine.surface().has_class(CssClass::FgDeactivation));
/// ```
pub struct RippleEngine<A: Surface, S: Scheduler<Task> = ManualScheduler<Task>> {
    surface: A,
    sched: S,
    claims: SharedClaims<A::Target>,
    activation: ActivationState<A::Target>,
    previous_activation: Option<EventKind>,
    frame: Rect,
    initial_size: f64,
    max_radius: f64,
    fg_scale: f64,
    unbounded_coords: Point,
    growth_animation_done: bool,
    activation_timer: Option<TimerHandle>,
    fg_deactivation_timer: Option<TimerHandle>,
    cooldown_timer: Option<TimerHandle>,
    layout_frame: Option<FrameHandle>,
}

impl<A: Surface, S: Scheduler<Task>> core::fmt::Debug for RippleEngine<A, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RippleEngine")
            .field("is_activated", &self.activation.is_activated)
            .field("frame", &self.frame)
            .field("initial_size", &self.initial_size)
            .field("max_radius", &self.max_radius)
            .field("fg_scale", &self.fg_scale)
            .finish_non_exhaustive()
    }
}

impl<A: Surface> RippleEngine<A, ManualScheduler<Task>> {
    /// Create an engine with its own [`ManualScheduler`] and a private claim
    /// registry, for hosts with a single ripple surface (and for tests).
    pub fn standalone(surface: A) -> Self {
        Self::new(surface, ManualScheduler::new(), ClaimSet::shared())
    }
}

impl<A: Surface, S: Scheduler<Task>> RippleEngine<A, S> {
    /// Create an engine over `surface`, driven by `sched`, sharing `claims`
    /// with every other engine in the same document.
    pub fn new(surface: A, sched: S, claims: SharedClaims<A::Target>) -> Self {
        Self {
            surface,
            sched,
            claims,
            activation: ActivationState::default(),
            previous_activation: None,
            frame: Rect::ZERO,
            initial_size: 0.0,
            max_radius: 0.0,
            fg_scale: 0.0,
            unbounded_coords: Point::ZERO,
            growth_animation_done: false,
            activation_timer: None,
            fg_deactivation_timer: None,
            cooldown_timer: None,
            layout_frame: None,
        }
    }

    /// The adapter this engine drives.
    pub fn surface(&self) -> &A {
        &self.surface
    }

    /// Mutable access to the adapter, mainly for hosts that fold extra state
    /// into their `Surface` implementation.
    pub fn surface_mut(&mut self) -> &mut A {
        &mut self.surface
    }

    /// The scheduler driving this engine.
    pub fn scheduler(&self) -> &S {
        &self.sched
    }

    /// Mutable access to the scheduler, e.g. to advance a manual clock.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.sched
    }

    /// The claim registry this engine shares.
    pub fn claims(&self) -> &SharedClaims<A::Target> {
        &self.claims
    }

    /// True between a recognized activation and its resolved deactivation.
    pub fn is_activated(&self) -> bool {
        self.activation.is_activated
    }

    /// Register handlers and schedule the upgrade classes.
    ///
    /// When the platform lacks custom-property support only focus/blur are
    /// registered and no classes are applied; the surface stays inert but
    /// keyboard-focusable. The capability is queried here, not at
    /// construction, for hosts where detection must wait until mount.
    pub fn init(&mut self) {
        let supported = self.supports_press_ripple();
        self.register_root_handlers(supported);
        if supported {
            self.sched.request_frame(Task::InitClasses);
        }
    }

    /// Cancel pending work, strip all engine-owned classes and variables, and
    /// deregister every handler `init` registered.
    pub fn destroy(&mut self) {
        if self.supports_press_ripple() {
            if let Some(t) = self.activation_timer.take() {
                self.sched.cancel_timer(t);
                self.surface.remove_class(CssClass::FgActivation);
            }
            if let Some(t) = self.fg_deactivation_timer.take() {
                self.sched.cancel_timer(t);
                self.surface.remove_class(CssClass::FgDeactivation);
            }
            if let Some(t) = self.cooldown_timer.take() {
                self.sched.cancel_timer(t);
            }
            if let Some(h) = self.layout_frame.take() {
                self.sched.cancel_frame(h);
            }
            self.sched.request_frame(Task::DestroyCleanup);
        }
        self.deregister_root_handlers();
        self.deregister_deactivation_handlers();
    }

    /// Begin an interaction.
    ///
    /// `None` means programmatic activation; otherwise pass the reduced DOM
    /// event. No-ops: disabled surface, an interaction already in flight, a
    /// different-kind event inside the cooldown window, and (after a silent
    /// reset) an event whose target was already claimed by a nested surface.
    pub fn activate(&mut self, event: Option<ActivationEvent<A::Target>>) {
        if self.surface.is_surface_disabled() {
            return;
        }
        if self.activation.is_activated {
            return;
        }
        if let (Some(previous), Some(ev)) = (self.previous_activation, event.as_ref()) {
            // Touch browsers replay the tap as a synthetic mouse/pointer
            // event; a different kind inside the cooldown window is the same
            // physical interaction.
            if previous != ev.kind {
                return;
            }
        }

        self.activation.is_activated = true;
        self.activation.is_programmatic = event.is_none();
        self.activation.was_activated_by_pointer =
            event.as_ref().is_some_and(|ev| ev.kind.is_pointer());
        self.activation.activation_event = event.clone();

        let mut space_retry = false;
        if let Some(ev) = event {
            let claims = Rc::clone(&self.claims);
            let claimed_within = claims
                .borrow()
                .iter()
                .any(|t| self.surface.contains_event_target(t));
            if claimed_within {
                // A descendant surface already owns this physical press.
                self.reset_activation_state();
                return;
            }
            claims.borrow_mut().claim(ev.target.clone());
            self.register_deactivation_handlers(ev.kind);
            space_retry = ev.kind == EventKind::KeyDown && ev.space_key;
        }

        self.activation.was_element_made_active = self.check_element_made_active();
        if self.activation.was_element_made_active {
            self.animate_activation();
        }
        self.sched
            .request_frame(Task::ActivationSettle { space_retry });
    }

    /// End the in-flight interaction, if any.
    ///
    /// Called by the host on `keyup` or any pointer-release event, and
    /// directly for programmatic interactions.
    pub fn deactivate(&mut self) {
        if !self.activation.is_activated {
            return;
        }
        let snapshot = DeactivationSnapshot {
            was_activated_by_pointer: self.activation.was_activated_by_pointer,
            was_element_made_active: self.activation.was_element_made_active,
        };
        if self.activation.is_programmatic {
            self.sched.request_frame(Task::Deactivate {
                snapshot,
                programmatic: true,
            });
            self.reset_activation_state();
        } else {
            self.deregister_deactivation_handlers();
            self.sched.request_frame(Task::Deactivate {
                snapshot,
                programmatic: false,
            });
        }
    }

    /// Re-measure and republish geometry, debounced to once per frame.
    ///
    /// Repeated calls before the frame tick collapse into a single
    /// measurement; the pending pass is canceled and rescheduled, never
    /// stacked. Hosts also route resize notifications here.
    pub fn layout(&mut self) {
        if let Some(h) = self.layout_frame.take() {
            self.sched.cancel_frame(h);
        }
        self.layout_frame = Some(self.sched.request_frame(Task::Layout));
    }

    /// Toggle the unbounded class on the surface.
    ///
    /// The adapter's [`Surface::is_unbounded`] remains the source of truth for
    /// geometry; hosts flip both together.
    pub fn set_unbounded(&mut self, unbounded: bool) {
        if unbounded {
            self.surface.add_class(CssClass::Unbounded);
        } else {
            self.surface.remove_class(CssClass::Unbounded);
        }
    }

    /// The surface gained keyboard focus; the tint lands next frame.
    pub fn handle_focus(&mut self) {
        self.sched.request_frame(Task::FocusGained);
    }

    /// The surface lost keyboard focus; the tint clears next frame.
    pub fn handle_blur(&mut self) {
        self.sched.request_frame(Task::FocusLost);
    }

    /// Run the frame tasks queued for this tick, in FIFO order.
    pub fn on_frame(&mut self) {
        for task in self.sched.take_frame_tasks() {
            self.run(task);
        }
    }

    /// Fire every timer whose deadline has passed.
    pub fn on_timers(&mut self) {
        for task in self.sched.take_due_timers() {
            self.run(task);
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::InitClasses => {
                self.surface.add_class(CssClass::Root);
                if self.surface.is_unbounded() {
                    self.surface.add_class(CssClass::Unbounded);
                    // Unbounded surfaces need coordinates before any
                    // interaction so the focus tint is already positioned.
                    self.layout_internal();
                }
            }
            Task::DestroyCleanup => {
                self.surface.remove_class(CssClass::Root);
                self.surface.remove_class(CssClass::Unbounded);
                for var in CssVar::ALL {
                    self.surface.update_css_variable(var, None);
                }
            }
            Task::ActivationSettle { space_retry } => self.settle_activation(space_retry),
            Task::Deactivate {
                snapshot,
                programmatic,
            } => {
                if !programmatic {
                    self.activation.has_deactivation_ux_run = true;
                }
                self.animate_deactivation(snapshot);
                if !programmatic {
                    self.reset_activation_state();
                }
            }
            Task::Layout => {
                self.layout_frame = None;
                self.layout_internal();
            }
            Task::FocusGained => self.surface.add_class(CssClass::BgFocused),
            Task::FocusLost => self.surface.remove_class(CssClass::BgFocused),
            Task::GrowthComplete => {
                self.activation_timer = None;
                self.growth_animation_done = true;
                self.run_deactivation_ux_if_ready();
            }
            Task::FgDeactivationEnd => {
                self.fg_deactivation_timer = None;
                self.surface.remove_class(CssClass::FgDeactivation);
            }
            Task::CooldownExpired => {
                self.cooldown_timer = None;
                self.previous_activation = None;
            }
        }
    }

    fn supports_press_ripple(&self) -> bool {
        self.surface.browser_supports_css_vars()
    }

    fn register_root_handlers(&mut self, supported: bool) {
        if supported {
            for ty in ACTIVATION_EVENT_TYPES {
                self.surface.register_interaction_handler(ty);
            }
            if self.surface.is_unbounded() {
                self.surface.register_resize_handler();
            }
        }
        self.surface.register_interaction_handler(EventType::Focus);
        self.surface.register_interaction_handler(EventType::Blur);
    }

    fn deregister_root_handlers(&mut self) {
        for ty in ACTIVATION_EVENT_TYPES {
            self.surface.deregister_interaction_handler(ty);
        }
        self.surface.deregister_interaction_handler(EventType::Focus);
        self.surface.deregister_interaction_handler(EventType::Blur);
        if self.surface.is_unbounded() {
            self.surface.deregister_resize_handler();
        }
    }

    fn register_deactivation_handlers(&mut self, kind: EventKind) {
        if kind == EventKind::KeyDown {
            self.surface.register_interaction_handler(EventType::KeyUp);
        } else {
            // Pointer release may land anywhere, so listen document-wide.
            for ty in POINTER_RELEASE_EVENT_TYPES {
                self.surface.register_document_interaction_handler(ty);
            }
        }
    }

    fn deregister_deactivation_handlers(&mut self) {
        self.surface.deregister_interaction_handler(EventType::KeyUp);
        for ty in POINTER_RELEASE_EVENT_TYPES {
            self.surface.deregister_document_interaction_handler(ty);
        }
    }

    fn check_element_made_active(&mut self) -> bool {
        match &self.activation.activation_event {
            // Browsers disagree on whether :active is observable during the
            // keydown dispatch, hence the live query.
            Some(ev) if ev.kind == EventKind::KeyDown => self.surface.is_surface_active(),
            _ => true,
        }
    }

    fn settle_activation(&mut self, space_retry: bool) {
        self.claims.borrow_mut().clear();
        if !self.activation.was_element_made_active && space_retry {
            // The space key's active state can show up one frame late.
            self.activation.was_element_made_active = self.check_element_made_active();
            if self.activation.was_element_made_active {
                self.animate_activation();
            }
        }
        if !self.activation.was_element_made_active {
            // A keyboard press that never visually activated leaves no
            // residue, and no cooldown memory either.
            self.activation = ActivationState::default();
        }
    }

    fn animate_activation(&mut self) {
        self.layout_internal();

        if self.surface.is_unbounded() {
            // Unbounded ripples are centered by the stylesheet and carry no
            // translation of their own.
            self.surface.update_css_variable(CssVar::FgTranslateStart, None);
            self.surface.update_css_variable(CssVar::FgTranslateEnd, None);
        } else {
            let press = self.press_point();
            let t = geometry::fg_translation(self.frame.size(), self.initial_size, press);
            self.surface.update_css_variable(
                CssVar::FgTranslateStart,
                Some(VarValue::PxPair {
                    x: t.start.x,
                    y: t.start.y,
                }),
            );
            self.surface.update_css_variable(
                CssVar::FgTranslateEnd,
                Some(VarValue::PxPair { x: t.end.x, y: t.end.y }),
            );
        }

        // Cancel both animation windows; re-triggering replaces them.
        if let Some(t) = self.activation_timer.take() {
            self.sched.cancel_timer(t);
        }
        if let Some(t) = self.fg_deactivation_timer.take() {
            self.sched.cancel_timer(t);
        }
        self.rm_bounded_activation_classes();
        self.surface.remove_class(CssClass::FgDeactivation);
        // Forcing read: the class strips must be applied before the re-add,
        // or the growth animation does not restart.
        self.surface.compute_bounding_rect();
        self.surface.add_class(CssClass::FgActivation);
        self.activation_timer = Some(
            self.sched
                .set_timer(Task::GrowthComplete, DEACTIVATION_TIMEOUT_MS),
        );
    }

    /// Surface-relative press position, or `None` for keyboard/programmatic
    /// activation (which animates from the center).
    fn press_point(&mut self) -> Option<Point> {
        if !self.activation.was_activated_by_pointer {
            return None;
        }
        let page_point = self
            .activation
            .activation_event
            .as_ref()
            .and_then(|ev| ev.page_point)?;
        let offset = self.surface.window_page_offset();
        let rect = self.surface.compute_bounding_rect();
        Some(geometry::normalized_press_point(page_point, offset, rect))
    }

    fn animate_deactivation(&mut self, snapshot: DeactivationSnapshot) {
        if snapshot.was_activated_by_pointer || snapshot.was_element_made_active {
            self.run_deactivation_ux_if_ready();
        }
    }

    fn run_deactivation_ux_if_ready(&mut self) {
        // Whichever of (release, growth end) arrives second starts the fade.
        let release_side_done =
            self.activation.has_deactivation_ux_run || !self.activation.is_activated;
        if release_side_done && self.growth_animation_done {
            self.rm_bounded_activation_classes();
            self.surface.add_class(CssClass::FgDeactivation);
            if let Some(t) = self.fg_deactivation_timer.take() {
                self.sched.cancel_timer(t);
            }
            self.fg_deactivation_timer = Some(
                self.sched
                    .set_timer(Task::FgDeactivationEnd, FG_DEACTIVATION_MS),
            );
        }
    }

    fn rm_bounded_activation_classes(&mut self) {
        self.surface.remove_class(CssClass::FgActivation);
        self.growth_animation_done = false;
        // Forcing read, see animate_activation.
        self.surface.compute_bounding_rect();
    }

    fn reset_activation_state(&mut self) {
        self.previous_activation = self
            .activation
            .activation_event
            .as_ref()
            .map(|ev| ev.kind);
        self.activation = ActivationState::default();
        if let Some(t) = self.cooldown_timer.take() {
            self.sched.cancel_timer(t);
        }
        self.cooldown_timer = Some(self.sched.set_timer(Task::CooldownExpired, TAP_DELAY_MS));
    }

    fn layout_internal(&mut self) {
        self.frame = self.surface.compute_bounding_rect();
        let unbounded = self.surface.is_unbounded();
        let geo = geometry::compute(self.frame.size(), unbounded);
        self.initial_size = geo.initial_size;
        self.max_radius = geo.max_radius;
        self.fg_scale = geo.fg_scale;

        self.surface
            .update_css_variable(CssVar::FgSize, Some(VarValue::Px(self.initial_size)));
        self.surface
            .update_css_variable(CssVar::FgScale, Some(VarValue::Number(self.fg_scale)));
        if unbounded {
            self.unbounded_coords =
                geometry::unbounded_center_offset(self.frame.size(), self.initial_size);
            self.surface
                .update_css_variable(CssVar::Left, Some(VarValue::Px(self.unbounded_coords.x)));
            self.surface
                .update_css_variable(CssVar::Top, Some(VarValue::Px(self.unbounded_coords.y)));
        }
    }
}
