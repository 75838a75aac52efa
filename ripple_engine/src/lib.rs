// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple Engine: a pointer/keyboard tactile-feedback state machine.
//!
//! ## Overview
//!
//! This crate implements the activation/deactivation state machine behind a
//! press-ripple effect: the expanding foreground circle and background tint
//! that acknowledge a press on a widget surface. The engine is the shared
//! feedback layer for whole widget families (buttons, checkboxes, list rows,
//! tabs), so it lives apart from any concrete toolkit.
//!
//! The engine does no rendering. It drives the host's CSS (or CSS-like)
//! animation by toggling classes and publishing custom-property values through
//! the [`Surface`] adapter trait, which the host implements once per widget.
//! Everything the machine defers — frame-aligned mutation, the growth and fade
//! windows, the tap cooldown — goes through the
//! [`ripple_sched::Scheduler`] seam, so the whole machine runs deterministically
//! under a fake clock.
//!
//! ## What the machine coordinates
//!
//! - **Overlapping input families.** A touch press arrives as `touchstart`
//!   and is then replayed by the platform as a synthetic mouse event; the
//!   cooldown window absorbs the replay. Keyboard presses only animate when
//!   the surface truly entered its native active state, with a one-frame
//!   retry for the space key.
//! - **Nested surfaces.** A press on a ripple surface inside another ripple
//!   surface must animate exactly once. Engines share a
//!   [`claims::ClaimSet`] registry; the first surface claims the event
//!   target, ancestors see the claim and stand down.
//! - **Release/animation ordering.** The fade runs only after *both* the
//!   release signal and the growth window have completed, whichever comes
//!   second.
//! - **Geometry.** Bounded surfaces grow a circle from the press point past
//!   their bounding diagonal; unbounded surfaces use a centered square. See
//!   [`geometry`].
//!
//! ## Usage
//!
//! ```
//! use kurbo::{Point, Rect};
//! use ripple_engine::testing::TraceSurface;
//! use ripple_engine::{ActivationEvent, CssClass, RippleEngine};
//!
//! // The host implements `Surface` for its widgets; `TraceSurface` is the
//! // in-memory implementation used for tests and demos.
//! let surface: TraceSurface<u32> = TraceSurface::new(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let mut engine = RippleEngine::standalone(surface);
//! engine.init();
//! engine.on_frame();
//!
//! engine.activate(Some(ActivationEvent::pointer_down(1, Point::new(50.0, 25.0))));
//! engine.deactivate();
//! engine.on_frame();
//! engine.scheduler_mut().advance(ripple_engine::DEACTIVATION_TIMEOUT_MS);
//! engine.on_timers();
//! assert!(engine.surface().has_class(CssClass::FgDeactivation));
//! ```
//!
//! Multiple engines in one document share a claim registry:
//!
//! ```
//! use kurbo::Rect;
//! use ripple_engine::claims::ClaimSet;
//! use ripple_engine::testing::TraceSurface;
//! use ripple_engine::{RippleEngine, Task};
//! use ripple_sched::ManualScheduler;
//!
//! let claims = ClaimSet::<u32>::shared();
//! let row = RippleEngine::new(
//!     TraceSurface::new(Rect::new(0.0, 0.0, 400.0, 48.0)),
//!     ManualScheduler::<Task>::new(),
//!     claims.clone(),
//! );
//! let icon = RippleEngine::new(
//!     TraceSurface::new(Rect::new(360.0, 4.0, 400.0, 44.0)),
//!     ManualScheduler::<Task>::new(),
//!     claims.clone(),
//! );
//! # let _ = (row, icon);
//! ```
//!
//! ## Host integration
//!
//! A real host implements [`Surface`] over its DOM (or DOM-like) elements,
//! forwards subscribed events into [`RippleEngine::activate`] /
//! [`RippleEngine::deactivate`] / [`RippleEngine::handle_focus`] /
//! [`RippleEngine::handle_blur`] / [`RippleEngine::layout`], calls
//! [`RippleEngine::on_frame`] from its animation-frame tick, and calls
//! [`RippleEngine::on_timers`] once the scheduler clock passes
//! the next deadline.

pub mod activation;
pub mod claims;
pub mod engine;
pub mod geometry;
pub mod surface;
pub mod testing;

pub use activation::{ActivationEvent, EventKind};
pub use claims::{ClaimSet, SharedClaims};
pub use engine::{
    DEACTIVATION_TIMEOUT_MS, DeactivationSnapshot, FG_DEACTIVATION_MS, RippleEngine, TAP_DELAY_MS,
    Task,
};
pub use surface::{CssClass, CssVar, EventType, Surface, VarValue};
