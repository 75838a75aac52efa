// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared per-frame activation claim registry.
//!
//! When a press lands on nested ripple surfaces (say a list row hosting an
//! icon button), the same physical event reaches both engines as it bubbles.
//! Only the first surface to claim the event's target may animate; an engine
//! that finds an already-claimed target contained within its own surface
//! resets silently instead.
//!
//! The registry is an explicitly constructed [`SharedClaims`] handle passed to
//! every engine that shares a document — there is no implicit global. It holds
//! claims for at most one frame: the claiming engine's settle task clears the
//! whole set on the next frame tick, after the event has finished bubbling.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

/// Event targets that have claimed an activation during the current frame.
#[derive(Clone, Debug)]
pub struct ClaimSet<K> {
    targets: SmallVec<[K; 4]>,
}

/// A claim registry shared by every engine in one document.
pub type SharedClaims<K> = Rc<RefCell<ClaimSet<K>>>;

impl<K: Clone + PartialEq> ClaimSet<K> {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self {
            targets: SmallVec::new(),
        }
    }

    /// Create an empty registry ready to be handed to several engines.
    pub fn shared() -> SharedClaims<K> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Record that `target` has claimed the current frame's activation.
    pub fn claim(&mut self, target: K) {
        self.targets.push(target);
    }

    /// True when no target has claimed an activation this frame.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate the claimed targets, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.targets.iter()
    }

    /// Drop every claim; runs once per frame tick.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

impl<K: Clone + PartialEq> Default for ClaimSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_accumulate_and_clear() {
        let mut set: ClaimSet<u32> = ClaimSet::new();
        assert!(set.is_empty());

        set.claim(1);
        set.claim(2);
        assert!(!set.is_empty());
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn shared_handle_mutations_are_visible_to_all_clones() {
        let shared: SharedClaims<u32> = ClaimSet::shared();
        let other = Rc::clone(&shared);

        shared.borrow_mut().claim(9);
        assert!(other.borrow().iter().any(|t| *t == 9));

        other.borrow_mut().clear();
        assert!(shared.borrow().is_empty());
    }
}
