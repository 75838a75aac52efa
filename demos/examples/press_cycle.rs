// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted pointer press/release cycle against a recording surface.
//!
//! Prints the adapter traffic the engine produces at each stage, which is the
//! entire observable output of the machine: class toggles, custom-property
//! writes, and forcing reads.
//!
//! Run with: `cargo run -p ripple_demos --example press_cycle`

use kurbo::{Point, Rect};
use ripple_engine::testing::TraceSurface;
use ripple_engine::{
    ActivationEvent, DEACTIVATION_TIMEOUT_MS, FG_DEACTIVATION_MS, RippleEngine,
};

fn dump(stage: &str, engine: &RippleEngine<TraceSurface<u32>>, from: &mut usize) {
    println!("-- {stage}");
    let ops = engine.surface().ops();
    for op in &ops[*from..] {
        println!("   {op:?}");
    }
    *from = ops.len();
}

fn main() {
    let surface: TraceSurface<u32> = TraceSurface::new(Rect::new(0.0, 0.0, 200.0, 100.0));
    let mut engine = RippleEngine::standalone(surface);
    let mut seen = 0;

    engine.init();
    engine.on_frame();
    dump("init", &engine, &mut seen);

    engine.activate(Some(ActivationEvent::pointer_down(1, Point::new(50.0, 25.0))));
    dump("pointer down at (50, 25)", &engine, &mut seen);

    engine.deactivate();
    engine.on_frame();
    dump("pointer up (growth still running)", &engine, &mut seen);

    engine.scheduler_mut().advance(DEACTIVATION_TIMEOUT_MS);
    engine.on_timers();
    dump("growth window elapsed, fade begins", &engine, &mut seen);

    engine.scheduler_mut().advance(FG_DEACTIVATION_MS);
    engine.on_timers();
    dump("fade hold elapsed", &engine, &mut seen);

    engine.destroy();
    engine.on_frame();
    dump("destroy", &engine, &mut seen);
}
