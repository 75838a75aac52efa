// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple Sched: an injectable frame/timer scheduler seam for UI state machines.
//!
//! ## Overview
//!
//! Interaction state machines need two kinds of deferred work: animation-frame
//! callbacks (run work on the next paint tick, after the triggering event has
//! finished dispatching) and fixed-duration timers (animation windows, cooldown
//! windows). This crate models both behind the [`Scheduler`] trait so the state
//! machine itself stays deterministic and host-agnostic.
//!
//! Scheduled work is a plain task value (typically a small `enum` defined by
//! the machine), not a closure. The host pumps the scheduler and hands due
//! tasks back to the machine, which keeps ownership simple and makes every
//! interleaving replayable in tests.
//!
//! ## Frame semantics
//!
//! [`Scheduler::take_frame_tasks`] drains a snapshot of the queue in FIFO
//! order. Tasks scheduled while a snapshot is being executed land in the
//! *next* snapshot, matching `requestAnimationFrame` semantics: a callback
//! scheduled from within a frame callback runs on the following frame.
//!
//! ## Timer semantics
//!
//! Timers fire once, in deadline order; ties fire in arm order. Canceling a
//! handle that already fired (or was already canceled) is a no-op returning
//! `false`.
//!
//! ## Usage
//!
//! ```
//! use ripple_sched::{ManualScheduler, Scheduler};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Task {
//!     Settle,
//!     CooldownExpired,
//! }
//!
//! let mut sched = ManualScheduler::new();
//! sched.request_frame(Task::Settle);
//! sched.set_timer(Task::CooldownExpired, 300);
//!
//! // Next frame tick: the frame task is due, the timer is not.
//! assert_eq!(sched.take_frame_tasks(), [Task::Settle]);
//! assert!(sched.take_due_timers().is_empty());
//!
//! // 300ms later the timer fires.
//! sched.advance(300);
//! assert_eq!(sched.take_due_timers(), [Task::CooldownExpired]);
//! ```
//!
//! [`ManualScheduler`] is the provided implementation: a virtual clock plus
//! explicit pumping, usable both as the deterministic test fake and as the
//! bookkeeping core of a real host (map [`Scheduler::take_frame_tasks`] to the
//! host's frame tick and [`ManualScheduler::next_timer_deadline`] to its timer
//! facility).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Handle to a pending frame task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Handle to a pending timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Scheduling seam for frame-deferred and timer-deferred tasks.
///
/// `T` is the task payload type, chosen by the state machine that owns the
/// scheduler. Implementations must preserve FIFO order for frame tasks and
/// deadline order (ties in arm order) for timers.
pub trait Scheduler<T> {
    /// Schedule `task` for the next frame tick.
    fn request_frame(&mut self, task: T) -> FrameHandle;

    /// Cancel a pending frame task.
    ///
    /// Returns `true` if the task was still pending.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;

    /// Schedule `task` to fire `delay_ms` from now.
    fn set_timer(&mut self, task: T, delay_ms: u64) -> TimerHandle;

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer had not yet fired.
    fn cancel_timer(&mut self, handle: TimerHandle) -> bool;

    /// Drain the current frame queue, in FIFO order.
    ///
    /// Tasks scheduled after this call (including from task execution) belong
    /// to the next frame and are not part of the returned snapshot.
    fn take_frame_tasks(&mut self) -> Vec<T>;

    /// Drain every timer whose deadline has passed, in deadline order.
    fn take_due_timers(&mut self) -> Vec<T>;
}

#[derive(Debug)]
struct TimerEntry<T> {
    fire_at: u64,
    task: T,
}

/// Deterministic [`Scheduler`] over a virtual millisecond clock.
///
/// Time only moves when [`ManualScheduler::advance`] is called, and nothing
/// runs until the owner pumps [`Scheduler::take_frame_tasks`] /
/// [`Scheduler::take_due_timers`]. This is the fake clock and frame pump used
/// throughout the engine tests, and doubles as the bookkeeping core for real
/// hosts.
#[derive(Debug)]
pub struct ManualScheduler<T> {
    now: u64,
    next_handle: u64,
    frames: SmallVec<[(u64, T); 4]>,
    timers: HashMap<u64, TimerEntry<T>>,
}

impl<T> ManualScheduler<T> {
    /// Create an empty scheduler with the clock at zero.
    pub fn new() -> Self {
        Self {
            now: 0,
            next_handle: 1,
            frames: SmallVec::new(),
            timers: HashMap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance the virtual clock by `ms`.
    ///
    /// Timers whose deadline is reached become due; they fire on the next
    /// [`Scheduler::take_due_timers`] call, not here.
    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// True if any frame task is queued for the next tick.
    pub fn has_frame_tasks(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Earliest pending timer deadline, if any timer is armed.
    ///
    /// Real hosts use this to arm a single native timeout for the next wakeup.
    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.timers.values().map(|entry| entry.fire_at).min()
    }

    /// Number of timers that have been armed and not yet fired or canceled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn alloc_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl<T> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> for ManualScheduler<T> {
    fn request_frame(&mut self, task: T) -> FrameHandle {
        let id = self.alloc_handle();
        self.frames.push((id, task));
        FrameHandle(id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(id, _)| *id != handle.0);
        self.frames.len() != before
    }

    fn set_timer(&mut self, task: T, delay_ms: u64) -> TimerHandle {
        let id = self.alloc_handle();
        let fire_at = self.now.saturating_add(delay_ms);
        self.timers.insert(id, TimerEntry { fire_at, task });
        TimerHandle(id)
    }

    fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle.0).is_some()
    }

    fn take_frame_tasks(&mut self) -> Vec<T> {
        core::mem::take(&mut self.frames)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }

    fn take_due_timers(&mut self) -> Vec<T> {
        let now = self.now;
        let mut due: Vec<(u64, u64, T)> = Vec::new();
        let ids: Vec<u64> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.fire_at <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            if let Some(entry) = self.timers.remove(&id) {
                due.push((entry.fire_at, id, entry.task));
            }
        }
        // Deadline order; handle ids are monotonic, so ties fire in arm order.
        due.sort_by_key(|(fire_at, id, _)| (*fire_at, *id));
        due.into_iter().map(|(_, _, task)| task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_tasks_drain_in_fifo_order() {
        let mut sched = ManualScheduler::new();
        sched.request_frame("a");
        sched.request_frame("b");
        sched.request_frame("c");

        assert_eq!(sched.take_frame_tasks(), ["a", "b", "c"]);
        assert!(sched.take_frame_tasks().is_empty());
    }

    #[test]
    fn frame_tasks_scheduled_after_drain_belong_to_next_frame() {
        let mut sched = ManualScheduler::new();
        sched.request_frame("first");

        let snapshot = sched.take_frame_tasks();
        assert_eq!(snapshot, ["first"]);

        // Scheduled "from within" the frame: must not appear until next drain.
        sched.request_frame("second");
        assert_eq!(sched.take_frame_tasks(), ["second"]);
    }

    #[test]
    fn cancel_frame_removes_only_that_task() {
        let mut sched = ManualScheduler::new();
        let a = sched.request_frame("a");
        sched.request_frame("b");

        assert!(sched.cancel_frame(a));
        assert!(!sched.cancel_frame(a));
        assert_eq!(sched.take_frame_tasks(), ["b"]);
    }

    #[test]
    fn timers_fire_only_after_their_deadline() {
        let mut sched = ManualScheduler::new();
        sched.set_timer("late", 225);

        sched.advance(224);
        assert!(sched.take_due_timers().is_empty());

        sched.advance(1);
        assert_eq!(sched.take_due_timers(), ["late"]);
        assert!(sched.take_due_timers().is_empty());
    }

    #[test]
    fn due_timers_fire_in_deadline_order_with_arm_order_ties() {
        let mut sched = ManualScheduler::new();
        sched.set_timer("slow", 300);
        sched.set_timer("fast", 100);
        sched.set_timer("also_fast", 100);

        sched.advance(300);
        assert_eq!(sched.take_due_timers(), ["fast", "also_fast", "slow"]);
    }

    #[test]
    fn canceled_timer_never_fires() {
        let mut sched = ManualScheduler::new();
        let t = sched.set_timer("never", 50);

        assert!(sched.cancel_timer(t));
        assert!(!sched.cancel_timer(t));

        sched.advance(1000);
        assert!(sched.take_due_timers().is_empty());
    }

    #[test]
    fn next_timer_deadline_tracks_earliest_pending() {
        let mut sched = ManualScheduler::new();
        assert_eq!(sched.next_timer_deadline(), None);

        sched.set_timer("b", 300);
        let a = sched.set_timer("a", 150);
        assert_eq!(sched.next_timer_deadline(), Some(150));

        sched.cancel_timer(a);
        assert_eq!(sched.next_timer_deadline(), Some(300));
    }

    #[test]
    fn deadlines_are_relative_to_arm_time() {
        let mut sched = ManualScheduler::new();
        sched.advance(1000);
        sched.set_timer("t", 150);

        assert_eq!(sched.next_timer_deadline(), Some(1150));
        sched.advance(150);
        assert_eq!(sched.take_due_timers(), ["t"]);
    }

    #[test]
    fn pending_timers_counts_armed_timers() {
        let mut sched = ManualScheduler::new();
        assert_eq!(sched.pending_timers(), 0);

        sched.set_timer("a", 10);
        sched.set_timer("b", 20);
        assert_eq!(sched.pending_timers(), 2);

        sched.advance(10);
        sched.take_due_timers();
        assert_eq!(sched.pending_timers(), 1);
    }
}
