//! Roving focus over an ordered list of targets.
//!
//! A [`FocusRing`] keeps exactly one active index, the target that is
//! reachable by sequential keyboard traversal. Movement wraps around at both
//! ends. The ring does not know about keys: hosts map keys to a
//! [`Direction`] through [`Orientation::direction_for`] and call
//! [`FocusRing::focus`].

use std::fmt;

use navmenu_types::{Direction, MenuKey, Orientation, TargetId};

use crate::error::FocusRingError;
use crate::target::Focusable;

/// Hook invoked after internal key handling.
///
/// Receives the key and whether the owner already handled it.
pub type KeyHook = Box<dyn FnMut(MenuKey, bool) -> HookVerdict>;

/// What a [`KeyHook`] wants done with a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookVerdict {
    /// Keep whatever the owner decided.
    #[default]
    Continue,
    /// Hand the key to the parent context even if it was handled.
    Escalate,
    /// Swallow the key; the parent never sees it.
    Consume,
}

/// Construction options for a [`FocusRing`].
#[derive(Default)]
pub struct RingOptions {
    pub orientation: Orientation,
    /// Active index used until the first explicit move. Clamped into range.
    pub initial_index: usize,
    pub key_hook: Option<KeyHook>,
}

impl RingOptions {
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::default()
        }
    }

    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            ..Self::default()
        }
    }

    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    pub fn with_key_hook(mut self, hook: impl FnMut(MenuKey, bool) -> HookVerdict + 'static) -> Self {
        self.key_hook = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for RingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingOptions")
            .field("orientation", &self.orientation)
            .field("initial_index", &self.initial_index)
            .field("key_hook", &self.key_hook.is_some())
            .finish()
    }
}

/// Ordered targets plus a single active index.
///
/// Invariant: `active_index < len` whenever the ring is non-empty.
pub struct FocusRing<T> {
    targets: Vec<T>,
    active_index: usize,
    initial_index: usize,
    /// Set once the active index was chosen explicitly; until then
    /// registrations keep honoring `initial_index`.
    settled: bool,
    orientation: Orientation,
    key_hook: Option<KeyHook>,
}

impl<T: Focusable> FocusRing<T> {
    pub fn new(options: RingOptions) -> Self {
        Self {
            targets: Vec::new(),
            active_index: 0,
            initial_index: options.initial_index,
            settled: false,
            orientation: options.orientation,
            key_hook: options.key_hook,
        }
    }

    /// Builds a ring over `targets` in the given order.
    pub fn with_targets(targets: Vec<T>, options: RingOptions) -> Self {
        let mut ring = Self::new(options);
        ring.targets = targets;
        ring.active_index = ring.clamp(ring.initial_index);
        ring
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Active index, or `None` for an empty ring.
    pub fn active_index(&self) -> Option<usize> {
        (!self.targets.is_empty()).then_some(self.active_index)
    }

    pub fn active(&self) -> Option<&T> {
        self.targets.get(self.active_index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.targets.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.targets.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.targets.iter_mut()
    }

    pub fn position(&self, id: &TargetId) -> Option<usize> {
        self.targets.iter().position(|target| target.id() == id)
    }

    /// Inserts or updates `target` at `index` and returns where it landed.
    ///
    /// Registering an id again at its current index replaces it in place.
    /// A known id registered at another index is moved there. Indices past the
    /// end append. The active target stays active when it survives.
    pub fn register(&mut self, target: T, index: usize) -> usize {
        let active_id = self.active_id();
        let position = match self.position(target.id()) {
            Some(existing) if existing == index => {
                self.targets[existing] = target;
                existing
            }
            Some(existing) => {
                self.targets.remove(existing);
                let at = index.min(self.targets.len());
                self.targets.insert(at, target);
                at
            }
            None => {
                let at = index.min(self.targets.len());
                self.targets.insert(at, target);
                at
            }
        };
        self.restore_active(active_id);
        position
    }

    /// Removes the target with `id`, clamping the active index.
    pub fn deregister(&mut self, id: &TargetId) -> Option<T> {
        let index = self.position(id)?;
        let active_id = self.active_id();
        let removed = self.targets.remove(index);
        self.restore_active(active_id);
        Some(removed)
    }

    /// Moves the active index one step with wraparound and returns the newly
    /// focused target. No-op on an empty ring.
    pub fn focus(&mut self, direction: Direction) -> Option<&T> {
        let len = self.targets.len();
        if len == 0 {
            return None;
        }
        self.active_index = match direction {
            Direction::Next => (self.active_index + 1) % len,
            Direction::Previous => (self.active_index + len - 1) % len,
        };
        self.settled = true;
        self.targets.get(self.active_index)
    }

    pub fn focus_next(&mut self) -> Option<&T> {
        self.focus(Direction::Next)
    }

    pub fn focus_previous(&mut self) -> Option<&T> {
        self.focus(Direction::Previous)
    }

    pub fn focus_first(&mut self) -> Option<&T> {
        if self.targets.is_empty() {
            return None;
        }
        self.active_index = 0;
        self.settled = true;
        self.targets.first()
    }

    pub fn focus_last(&mut self) -> Option<&T> {
        let last = self.targets.len().checked_sub(1)?;
        self.active_index = last;
        self.settled = true;
        self.targets.last()
    }

    /// Sets the active index without transferring focus (pointer clicks).
    pub fn set_active(&mut self, index: usize) -> Result<(), FocusRingError> {
        if index >= self.targets.len() {
            return Err(FocusRingError::IndexOutOfRange {
                index,
                len: self.targets.len(),
            });
        }
        self.active_index = index;
        self.settled = true;
        Ok(())
    }

    pub fn set_active_id(&mut self, id: &TargetId) -> Result<usize, FocusRingError> {
        let index = self.position(id).ok_or_else(|| FocusRingError::UnknownTarget(id.clone()))?;
        self.set_active(index)?;
        Ok(index)
    }

    /// Puts the active index back on the first target.
    pub fn reset(&mut self) {
        self.active_index = 0;
    }

    /// Maps `key` through this ring's orientation.
    pub fn direction_for(&self, key: MenuKey) -> Option<Direction> {
        self.orientation.direction_for(key)
    }

    /// Runs the caller-supplied hook, if any. `handled` tells it whether the
    /// owner already used the key.
    pub fn run_key_hook(&mut self, key: MenuKey, handled: bool) -> HookVerdict {
        match self.key_hook.as_mut() {
            Some(hook) => hook(key, handled),
            None => HookVerdict::Continue,
        }
    }

    fn active_id(&self) -> Option<TargetId> {
        self.active().map(|target| target.id().clone())
    }

    fn restore_active(&mut self, active_id: Option<TargetId>) {
        if !self.settled {
            self.active_index = self.clamp(self.initial_index);
            return;
        }
        self.active_index = match active_id.and_then(|id| self.position(&id)) {
            Some(index) => index,
            None => self.clamp(self.active_index),
        };
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.targets.len().saturating_sub(1))
    }
}

impl<T: fmt::Debug> fmt::Debug for FocusRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRing")
            .field("targets", &self.targets)
            .field("active_index", &self.active_index)
            .field("orientation", &self.orientation)
            .field("key_hook", &self.key_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ring_of(count: usize) -> FocusRing<Target> {
        let targets = (0..count).map(|i| Target::link(format!("t{i}"), format!("Target {i}"), format!("/t/{i}"))).collect();
        FocusRing::with_targets(targets, RingOptions::horizontal())
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for count in 1..=6 {
            for start in 0..count {
                let mut ring = ring_of(count);
                ring.set_active(start).expect("start in range");
                for _ in 0..count {
                    ring.focus_next();
                }
                assert_eq!(ring.active_index(), Some(start), "count={count} start={start}");
            }
        }
    }

    #[test]
    fn empty_ring_moves_are_noops() {
        let mut ring: FocusRing<Target> = FocusRing::new(RingOptions::vertical());
        assert!(ring.focus_next().is_none());
        assert!(ring.focus_previous().is_none());
        assert!(ring.focus_first().is_none());
        assert!(ring.focus_last().is_none());
        assert_eq!(ring.active_index(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn movement_wraps_at_both_ends() {
        let mut ring = ring_of(3);
        assert_eq!(ring.focus_previous().map(|t| t.id.as_str()), Some("t2"));
        assert_eq!(ring.focus_next().map(|t| t.id.as_str()), Some("t0"));
    }

    #[test]
    fn set_active_rejects_out_of_range_and_keeps_state() {
        let mut ring = ring_of(3);
        ring.set_active(1).expect("in range");
        let error = ring.set_active(3).expect_err("out of range");
        assert_eq!(error, FocusRingError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(ring.active_index(), Some(1));
    }

    #[test]
    fn register_is_idempotent_at_the_same_index() {
        let mut ring = ring_of(2);
        let position = ring.register(Target::link("t1", "Renamed", "/t/1"), 1);
        assert_eq!(position, 1);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.get(1).map(|t| t.label.as_str()), Some("Renamed"));

        let again = ring.register(Target::link("t1", "Renamed", "/t/1"), 1);
        assert_eq!(again, 1);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn register_moves_known_ids_and_keeps_active_target() {
        let mut ring = ring_of(3);
        ring.set_active(2).expect("in range");
        ring.register(Target::link("t2", "Target 2", "/t/2"), 0);
        assert_eq!(ring.get(0).map(|t| t.id.as_str()), Some("t2"));
        assert_eq!(ring.active_index(), Some(0));

        ring.register(Target::link("late", "Late", "/late"), 99);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.get(3).map(|t| t.id.as_str()), Some("late"));
    }

    #[test]
    fn deregistering_the_active_target_clamps() {
        let mut ring = ring_of(3);
        ring.set_active(2).expect("in range");
        ring.deregister(&TargetId::from("t2")).expect("registered");
        assert_eq!(ring.active_index(), Some(1));
        assert!(ring.deregister(&TargetId::from("missing")).is_none());
    }

    #[test]
    fn initial_index_survives_incremental_registration() {
        let mut ring: FocusRing<Target> = FocusRing::new(RingOptions::horizontal().with_initial_index(1));
        ring.register(Target::link("a", "A", "/a"), 0);
        assert_eq!(ring.active_index(), Some(0));
        ring.register(Target::link("b", "B", "/b"), 1);
        ring.register(Target::link("c", "C", "/c"), 2);
        assert_eq!(ring.active_index(), Some(1));
    }

    #[test]
    fn key_hook_sees_handled_flag() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let options = RingOptions::vertical().with_key_hook(move |key, handled| {
            log.borrow_mut().push((key, handled));
            if key == MenuKey::ArrowRight { HookVerdict::Escalate } else { HookVerdict::Continue }
        });
        let mut ring: FocusRing<Target> = FocusRing::new(options);
        assert_eq!(ring.run_key_hook(MenuKey::ArrowDown, true), HookVerdict::Continue);
        assert_eq!(ring.run_key_hook(MenuKey::ArrowRight, false), HookVerdict::Escalate);
        assert_eq!(*seen.borrow(), vec![(MenuKey::ArrowDown, true), (MenuKey::ArrowRight, false)]);
    }
}
